use super::*;

#[derive(Default, Serialize)]
pub struct View {
    // interval between consecutive datapoints as fractional seconds
    interval: f64,
    source: String,
    version: String,
    filename: String,
    groups: Vec<Group>,
    sections: Vec<Section>,
}

impl View {
    pub fn new(data: &Tsdb, sections: Vec<Section>) -> Self {
        Self {
            // a recording too short to carry a period renders as zero
            interval: data.interval().unwrap_or_default(),
            source: data.source(),
            version: data.version(),
            filename: data.filename(),
            groups: Vec::new(),
            sections,
        }
    }

    pub fn group(&mut self, group: Group) -> &Self {
        self.groups.push(group);
        self
    }
}

#[derive(Clone, Serialize)]
pub struct Section {
    pub(crate) name: String,
    pub(crate) route: String,
}

#[derive(Serialize)]
pub struct Group {
    name: String,
    id: String,
    plots: Vec<Plot>,
}

impl Group {
    pub fn new<T: Into<String>, U: Into<String>>(name: T, id: U) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            plots: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    pub fn plot(&mut self, opts: PlotOpts, series: Option<&Series>) {
        if let Some(data) = series.map(|v| v.as_data()) {
            self.plots.push(Plot {
                opts,
                data,
                series_names: None,
            })
        }
    }

    // multi-series plot over a shared x axis
    pub fn multi(&mut self, opts: PlotOpts, x: Vec<f64>, mut series: Vec<(String, Vec<f64>)>) {
        if x.is_empty() || series.is_empty() {
            return;
        }

        let mut data = vec![x];
        let mut labels = Vec::new();

        for (label, values) in series.drain(..) {
            labels.push(label);
            data.push(values);
        }

        self.plots.push(Plot {
            opts,
            data,
            series_names: Some(labels),
        });
    }
}

#[derive(Serialize, Clone)]
pub struct Plot {
    data: Vec<Vec<f64>>,
    opts: PlotOpts,
    #[serde(skip_serializing_if = "Option::is_none")]
    series_names: Option<Vec<String>>,
}

#[derive(Serialize, Clone)]
pub struct PlotOpts {
    title: String,
    id: String,
    style: String,
    // Unified configuration for value formatting, axis labels, etc.
    format: Option<FormatConfig>,
}

/// Axis and value formatting for one plot. Unset options are absent from
/// the serialized document and the frontend falls back to its defaults.
#[derive(Serialize, Clone, Default)]
pub struct FormatConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    x_axis_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    y_axis_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    precision: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_x: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_y: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
}

impl PlotOpts {
    pub fn line<T: Into<String>, U: Into<String>>(title: T, id: U, unit: Unit) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            style: "line".to_string(),
            format: Some(FormatConfig::new(unit)),
        }
    }

    pub fn multi<T: Into<String>, U: Into<String>>(title: T, id: U, unit: Unit) -> Self {
        Self {
            title: title.into(),
            id: id.into(),
            style: "multi".to_string(),
            format: Some(FormatConfig::new(unit)),
        }
    }

    pub fn with_axis_label<T: Into<String>>(mut self, y_label: T) -> Self {
        if let Some(ref mut format) = self.format {
            format.y_axis_label = Some(y_label.into());
        }

        self
    }

    pub fn with_x_axis_label<T: Into<String>>(mut self, x_label: T) -> Self {
        if let Some(ref mut format) = self.format {
            format.x_axis_label = Some(x_label.into());
        }

        self
    }

    // both axes logarithmic, for deviation-over-tau plots
    pub fn with_log_log(mut self) -> Self {
        if let Some(ref mut format) = self.format {
            format.log_x = Some(true);
            format.log_y = Some(true);
        }

        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        if let Some(ref mut format) = self.format {
            format.min = Some(min);
            format.max = Some(max);
        }

        self
    }
}

impl FormatConfig {
    pub fn new(unit: Unit) -> Self {
        Self {
            unit_system: Some(unit.to_string()),
            precision: Some(2),
            ..Default::default()
        }
    }
}

pub enum Unit {
    Count,
    Time,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::Count => write!(f, "count"),
            Self::Time => write!(f, "time"),
        }
    }
}
