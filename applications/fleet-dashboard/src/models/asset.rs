use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Asset {
    pub fn location(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}
