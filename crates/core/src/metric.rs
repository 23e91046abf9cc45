use serde::{Deserialize, Serialize};

/// Which history series the dashboard graph shows.
///
/// `Both` draws CPU and RAM on one shared axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricSelector {
    #[default]
    Cpu,
    Ram,
    Both,
}

impl MetricSelector {
    /// Graph title shown above the plot.
    pub fn title(self) -> &'static str {
        match self {
            Self::Cpu  => "CPU percent",
            Self::Ram  => "RAM percent",
            Self::Both => "CPU and RAM percent",
        }
    }
}

impl std::str::FromStr for MetricSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu"  => Ok(Self::Cpu),
            "ram"  => Ok(Self::Ram),
            "both" => Ok(Self::Both),
            other  => Err(format!("unknown graph mode '{other}' (expected cpu, ram or both)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("CPU".parse::<MetricSelector>(), Ok(MetricSelector::Cpu));
        assert_eq!(" both ".parse::<MetricSelector>(), Ok(MetricSelector::Both));
        assert!("disk".parse::<MetricSelector>().is_err());
    }
}
