//! Shipping choice on a payment request

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMode {
    Pickup,
    #[default]
    Ship,
}

impl ShippingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Ship => "ship",
        }
    }

    /// Chat message posted on behalf of the buyer
    pub fn request_message(self) -> &'static str {
        match self {
            Self::Pickup => "De koper vraagt een betaalverzoek (afhalen)",
            Self::Ship => "De koper vraagt een betaalverzoek",
        }
    }
}
