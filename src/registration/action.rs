//! Inline-button action ids.
//!
//! Format: a fixed id (`add_channel`, ...) or a prefix plus an entity id
//! (`region_<id>`, `district_<id>`).

use std::fmt;

use super::regions::Region;

const REGION_PREFIX: &str = "region_";
const DISTRICT_PREFIX: &str = "district_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    StartRegistration,
    Region(Region),
    /// District id; resolved against the region stored in the session.
    District(String),
    AddChannel,
    SkipChannels,
    ConfirmRegistration,
    CancelRegistration,
}

impl CallbackAction {
    /// Parses callback data. Unknown data and unknown region ids yield `None`.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "start_registration" => Some(Self::StartRegistration),
            "add_channel" => Some(Self::AddChannel),
            "skip_channels" => Some(Self::SkipChannels),
            "confirm_registration" => Some(Self::ConfirmRegistration),
            "cancel_registration" => Some(Self::CancelRegistration),
            _ => {
                if let Some(id) = data.strip_prefix(REGION_PREFIX) {
                    Region::from_id(id).map(Self::Region)
                } else {
                    data.strip_prefix(DISTRICT_PREFIX)
                        .filter(|id| !id.is_empty())
                        .map(|id| Self::District(id.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartRegistration => f.write_str("start_registration"),
            Self::Region(region) => write!(f, "{}{}", REGION_PREFIX, region.id()),
            Self::District(id) => write!(f, "{}{}", DISTRICT_PREFIX, id),
            Self::AddChannel => f.write_str("add_channel"),
            Self::SkipChannels => f.write_str("skip_channels"),
            Self::ConfirmRegistration => f.write_str("confirm_registration"),
            Self::CancelRegistration => f.write_str("cancel_registration"),
        }
    }
}
