use serde::{Deserialize, Serialize};

/// Transform axis driven by an animation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Scale,
    TranslateX,
    TranslateY,
    Rotate,
}

impl Channel {
    /// Transform function name as it appears in the composite
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Scale => "scale",
            Channel::TranslateX => "translateX",
            Channel::TranslateY => "translateY",
            Channel::Rotate => "rotate",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One linear interpolation interval over frame position for one channel.
///
/// `start_frame <= end_frame` is expected but not checked; a zero-length
/// window interpolates to `NaN` on its single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationWindow {
    pub start_frame: f64,
    pub end_frame: f64,
    /// Value before and at `start_frame`
    pub start: f64,
    /// Value at and after `end_frame`
    pub end: f64,
    #[serde(alias = "type")]
    pub channel: Channel,
    /// Suffix appended to the value, e.g. `px` or `deg`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl AnimationWindow {
    pub fn new(start_frame: f64, end_frame: f64, start: f64, end: f64, channel: Channel) -> Self {
        Self {
            start_frame,
            end_frame,
            start,
            end,
            channel,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[inline]
    pub fn unit(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }

    /// Whether `position` lies inside `[start_frame, end_frame]`
    #[inline]
    pub fn is_active(&self, position: f64) -> bool {
        position >= self.start_frame && position <= self.end_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"startFrame":0,"endFrame":100,"start":1,"end":2,"channel":"translateX","unit":"px"}"#;
        let window: AnimationWindow = serde_json::from_str(json).unwrap();
        assert_eq!(
            window,
            AnimationWindow::new(0.0, 100.0, 1.0, 2.0, Channel::TranslateX).with_unit("px")
        );
    }

    #[test]
    fn test_type_alias_for_channel() {
        let json = r#"{"startFrame":0,"endFrame":10,"start":0,"end":90,"type":"rotate"}"#;
        let window: AnimationWindow = serde_json::from_str(json).unwrap();
        assert_eq!(window.channel, Channel::Rotate);
        assert_eq!(window.unit(), "");
    }

    #[test]
    fn test_is_active_bounds_inclusive() {
        let window = AnimationWindow::new(5.0, 15.0, 0.0, 1.0, Channel::Scale);
        assert!(window.is_active(5.0));
        assert!(window.is_active(15.0));
        assert!(!window.is_active(4.99));
        assert!(!window.is_active(15.01));
    }
}
