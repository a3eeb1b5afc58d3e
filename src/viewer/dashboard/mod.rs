use super::*;

mod series;
mod stability;

/// Renders one dashboard section from the full recording and its
/// render-reduced copy.
type Generator = fn(&Tsdb, &Tsdb, Vec<Section>) -> View;

// section name, route, and the generator for its view
static SECTION_META: &[(&str, &str, Generator)] = &[
    ("Stability", "/stability", stability::generate),
    ("Series", "/series", series::generate),
];

fn sections() -> Vec<Section> {
    SECTION_META
        .iter()
        .map(|(name, route, _)| Section {
            name: (*name).to_string(),
            route: (*route).to_string(),
        })
        .collect()
}

// column names may contain characters that are awkward as element ids
fn slug(name: &str) -> String {
    name.replace(|c: char| !c.is_ascii_alphanumeric(), "-")
        .to_ascii_lowercase()
}

/// Produces every section view, keyed the way the data endpoint serves
/// them. The estimators always run over the full recording; only the
/// rendered series are reduced.
pub fn build(
    data: &Tsdb,
    directive: Option<&SamplingDirective>,
    vector_output: bool,
    interactive: bool,
) -> Vec<(String, View)> {
    let sampled = sample(data, directive, vector_output, interactive);

    SECTION_META
        .iter()
        .map(|(_, route, generator)| {
            (
                format!("{}.json", &route[1..]),
                generator(data, &sampled, sections()),
            )
        })
        .collect()
}
