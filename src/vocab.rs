use serde::{Deserialize, Serialize};
use std::fmt;

/// Organization id used when none is configured.
pub const DEFAULT_DEPARTMENT_ID: &str = "mapo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Center {
    #[serde(rename = "대응단")]
    ResponseUnit,
    #[serde(rename = "서교")]
    Seogyo,
    #[serde(rename = "염리")]
    Yeomni,
    #[serde(rename = "공덕")]
    Gongdeok,
    #[serde(rename = "성산")]
    Seongsan,
    #[serde(rename = "상암")]
    Sangam,
}

impl Center {
    pub const ALL: [Center; 6] = [
        Center::ResponseUnit,
        Center::Seogyo,
        Center::Yeomni,
        Center::Gongdeok,
        Center::Seongsan,
        Center::Sangam,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Center::ResponseUnit => "대응단",
            Center::Seogyo => "서교",
            Center::Yeomni => "염리",
            Center::Gongdeok => "공덕",
            Center::Seongsan => "성산",
            Center::Sangam => "상암",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|center| center.label() == label)
    }
}

/// Shift category of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyType {
    #[serde(rename = "주간")]
    Day,
    #[serde(rename = "야간")]
    Night,
    #[serde(rename = "당번")]
    OnCall,
    /// Defined by an explicit time range instead of a fixed shift.
    #[serde(rename = "기타")]
    Other,
}

impl DutyType {
    pub const ALL: [DutyType; 4] = [
        DutyType::Day,
        DutyType::Night,
        DutyType::OnCall,
        DutyType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DutyType::Day => "주간",
            DutyType::Night => "야간",
            DutyType::OnCall => "당번",
            DutyType::Other => "기타",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|duty| duty.label() == label)
    }

    pub fn is_time_based(self) -> bool {
        self == DutyType::Other
    }
}

/// Reason code of an entry: a leave category or overtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentType {
    #[serde(rename = "연가")]
    AnnualLeave,
    #[serde(rename = "병가")]
    SickLeave,
    #[serde(rename = "공가")]
    OfficialLeave,
    #[serde(rename = "특별휴가")]
    SpecialLeave,
    #[serde(rename = "기타")]
    Other,
    #[serde(rename = "초과근무")]
    Overtime,
}

impl IncidentType {
    pub const ALL: [IncidentType; 6] = [
        IncidentType::AnnualLeave,
        IncidentType::SickLeave,
        IncidentType::OfficialLeave,
        IncidentType::SpecialLeave,
        IncidentType::Other,
        IncidentType::Overtime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncidentType::AnnualLeave => "연가",
            IncidentType::SickLeave => "병가",
            IncidentType::OfficialLeave => "공가",
            IncidentType::SpecialLeave => "특별휴가",
            IncidentType::Other => "기타",
            IncidentType::Overtime => "초과근무",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|incident| incident.label() == label)
    }

    pub fn is_overtime(self) -> bool {
        self == IncidentType::Overtime
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for DutyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for IncidentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_back_to_variants() {
        for center in Center::ALL {
            assert_eq!(Center::from_label(center.label()), Some(center));
        }
        for duty in DutyType::ALL {
            assert_eq!(DutyType::from_label(duty.label()), Some(duty));
        }
        for incident in IncidentType::ALL {
            assert_eq!(IncidentType::from_label(incident.label()), Some(incident));
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(Center::from_label("서교 "), None);
        assert_eq!(DutyType::from_label("day"), None);
        assert_eq!(IncidentType::from_label(""), None);
    }

    #[test]
    fn serde_uses_labels() {
        let json = serde_json::to_string(&IncidentType::Overtime).unwrap();
        assert_eq!(json, "\"초과근무\"");
        let duty: DutyType = serde_json::from_str("\"당번\"").unwrap();
        assert_eq!(duty, DutyType::OnCall);
    }
}
