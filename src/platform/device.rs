//! Platform probe flags reported by the host

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Platform {
    pub is_ios: bool,
    pub is_android: bool,
}

impl Platform {
    pub fn desktop() -> Self {
        Self::default()
    }

    pub fn ios() -> Self {
        Platform {
            is_ios: true,
            ..Default::default()
        }
    }

    pub fn android() -> Self {
        Platform {
            is_android: true,
            ..Default::default()
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.is_ios || self.is_android
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mobile_flags() {
        assert!(!Platform::desktop().is_mobile());
        assert!(Platform::ios().is_mobile());
        assert!(Platform::android().is_mobile());
    }
}
