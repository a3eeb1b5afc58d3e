use super::*;
use crate::stability::{compute, Estimator};

/// Allan deviation for every series in the recording, the standard and
/// overlapping estimators as separate lines on log-log axes.
pub fn generate(data: &Tsdb, _sampled: &Tsdb, sections: Vec<Section>) -> View {
    let mut view = View::new(data, sections);

    // deviations are normalized by the sampling period; a recording too
    // short to derive one falls back to unit period
    let period = data.interval().unwrap_or(1.0);

    for name in data.names() {
        let Some(series) = data.get(name) else {
            continue;
        };

        let values = series.values();

        let standard = compute(&values, Estimator::Standard);
        let overlapping = compute(&values, Estimator::Overlapping);

        if standard.is_empty() {
            continue;
        }

        let (taus, deviation) = standard.deviation_points(period);
        let (_, smoothed) = overlapping.deviation_points(period);

        let id = slug(name);
        let mut group = Group::new(name, format!("stability-{id}"));

        group.multi(
            PlotOpts::multi("Allan Deviation", format!("adev-{id}"), Unit::Time)
                .with_x_axis_label("Tau (s)")
                .with_axis_label("Allan Deviation")
                .with_log_log(),
            taus,
            vec![
                ("Standard".to_string(), deviation),
                ("Overlapping".to_string(), smoothed),
            ],
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
    fn short_series_are_omitted() {
        let mut data = Tsdb::default();
        data.insert(
            "offset",
            (0..4u64).map(|i| (i * 1_000_000_000, 0.0)).collect::<Series>(),
        );

        let view = generate(&data, &data, sections());
        let doc = serde_json::to_value(&view).unwrap();

        assert_eq!(doc["groups"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn deviations_are_plotted_against_tau_seconds() {
        let mut data = Tsdb::default();
        data.insert(
            "offset",
            (0..64u64)
                .map(|i| (i * 250_000_000, (i % 3) as f64))
                .collect::<Series>(),
        );

        let view = generate(&data, &data, sections());
        let doc = serde_json::to_value(&view).unwrap();

        let plot = &doc["groups"][0]["plots"][0];

        assert_eq!(
            plot["series_names"],
            serde_json::json!(["Standard", "Overlapping"])
        );

        // tau axis is scaled by the 0.25 s sampling period
        assert_eq!(plot["data"][0][0], serde_json::json!(0.5));

        // one x row and one row per estimator
        assert_eq!(plot["data"].as_array().unwrap().len(), 3);
    }
}
