use super::*;
use crate::common::units::Scale;
use crate::tsdb::{describe, DEFAULT_PTILE_RANGE};

/// The recorded series themselves, reduced for rendering, with unit
/// scaling and axis bounds derived from the full-resolution data.
pub fn generate(data: &Tsdb, sampled: &Tsdb, sections: Vec<Section>) -> View {
    let mut view = View::new(data, sections);

    for name in data.names() {
        // bounds and unit choice come from the full data so that sampling
        // cannot shift them
        let stats = match data.get(name).map(|s| describe(s, DEFAULT_PTILE_RANGE)) {
            Some(Ok(stats)) => stats,
            _ => continue,
        };

        let Some(series) = sampled.get(name) else {
            continue;
        };

        let scale = Scale::time(stats.spread());

        let mut scaled = series.clone();
        scaled.multiply_scalar(scale.multiplier());

        let id = slug(name);
        let mut group = Group::new(name, format!("series-{id}"));

        group.plot(
            PlotOpts::line(name, format!("series-plot-{id}"), Unit::Count)
                .with_axis_label(format!("{name} ({})", scale.suffix()))
                .with_range(
                    stats.lower * scale.multiplier(),
                    stats.upper * scale.multiplier(),
                ),
            Some(&scaled),
        );

        if !group.is_empty() {
            view.group(group);
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_scaled_to_the_unit_of_the_spread() {
        let mut data = Tsdb::default();

        // microsecond-magnitude offsets
        data.insert(
            "offset",
            (0..16u64)
                .map(|i| (i * 1_000_000_000, i as f64 * 1e-6))
                .collect::<Series>(),
        );

        let view = generate(&data, &data, sections());
        let doc = serde_json::to_value(&view).unwrap();

        let plot = &doc["groups"][0]["plots"][0];

        assert_eq!(plot["opts"]["format"]["y_axis_label"], "offset (us)");
        assert_eq!(plot["data"][1][1], serde_json::json!(1.0));
    }

    #[test]
    fn empty_columns_are_skipped() {
        let mut data = Tsdb::default();
        data.insert("empty", Series::default());

        let view = generate(&data, &data, sections());
        let doc = serde_json::to_value(&view).unwrap();

        assert_eq!(doc["groups"].as_array().unwrap().len(), 0);
    }
}
