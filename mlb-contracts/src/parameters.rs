use serde::{Deserialize, Serialize};

/// The four recognized parameter-store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterName {
    Interval,
    OverloadThreshold,
    TargetThreshold,
    DeltaOcn,
}

impl ParameterName {
    pub const ALL: [ParameterName; 4] = [
        ParameterName::Interval,
        ParameterName::OverloadThreshold,
        ParameterName::TargetThreshold,
        ParameterName::DeltaOcn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParameterName::Interval => "interval",
            ParameterName::OverloadThreshold => "overload_threshold",
            ParameterName::TargetThreshold => "target_threshold",
            ParameterName::DeltaOcn => "delta_ocn",
        }
    }
}

impl std::fmt::Display for ParameterName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The management API's `GetParameters`/`SetParameters` payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub interval: i32,
    pub overload_threshold: i32,
    pub target_threshold: i32,
    pub delta_ocn: i32,
}

/// `SetParameters`'s response — a bare success flag, no partial-failure
/// detail (per §6, "a single failure returns `success=false`").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetParametersResult {
    pub success: bool,
}
