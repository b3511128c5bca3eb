//! Custom cluster icon geometry.

use serde::{Deserialize, Deserializer, Serialize};
use toml::{Table, Value};

/// An integer pixel coordinate pair.
///
/// Both components are required. Hosts commonly store them as numeric
/// strings (`"20"`), so either form is accepted when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    #[serde(deserialize_with = "coordinate")]
    pub x: i64,
    #[serde(deserialize_with = "coordinate")]
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(i) => Ok(i),
        Raw::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate '{s}'"))),
    }
}

/// Icon attached to a profile, replacing the plugin's size-based cluster icons.
///
/// Replacing a profile's icon replaces this whole record; individual points
/// are never merged.
///
/// Loading is permissive: a recognized key holding a value of the wrong
/// shape is kept in `extra` under its own name and reaches the renderer as
/// written. Only a point carrying one of `x`/`y` fails to load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Table")]
pub struct IconDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_anchor: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_anchor: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_size: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_anchor: Option<Point>,
    /// Keys this crate does not model, or could not read, forwarded untouched.
    #[serde(flatten)]
    pub extra: Table,
}

impl TryFrom<Table> for IconDescriptor {
    type Error = String;

    fn try_from(mut table: Table) -> Result<Self, Self::Error> {
        Ok(Self {
            icon_url: take_string(&mut table, "iconUrl"),
            icon_size: take_point(&mut table, "iconSize")?,
            icon_anchor: take_point(&mut table, "iconAnchor")?,
            popup_anchor: take_point(&mut table, "popupAnchor")?,
            shadow_url: take_string(&mut table, "shadowUrl"),
            shadow_size: take_point(&mut table, "shadowSize")?,
            shadow_anchor: take_point(&mut table, "shadowAnchor")?,
            extra: table,
        })
    }
}

fn take_string(table: &mut Table, key: &str) -> Option<String> {
    match table.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            table.insert(key.to_string(), other);
            None
        }
    }
}

fn take_point(table: &mut Table, key: &str) -> Result<Option<Point>, String> {
    let Some(value) = table.remove(key) else {
        return Ok(None);
    };

    if let Value::Table(pair) = &value {
        if pair.contains_key("x") != pair.contains_key("y") {
            return Err(format!("{key} must set both x and y"));
        }
    }

    match value.clone().try_into::<Point>() {
        Ok(point) => Ok(Some(point)),
        Err(_) => {
            table.insert(key.to_string(), value);
            Ok(None)
        }
    }
}

impl IconDescriptor {
    /// Key names the icon record recognizes.
    pub const KEYS: [&'static str; 7] = [
        "iconUrl",
        "iconSize",
        "iconAnchor",
        "popupAnchor",
        "shadowUrl",
        "shadowSize",
        "shadowAnchor",
    ];

    pub fn new(icon_url: impl Into<String>) -> Self {
        Self {
            icon_url: Some(icon_url.into()),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: impl Into<Point>) -> Self {
        self.icon_size = Some(size.into());
        self
    }

    pub fn with_anchor(mut self, anchor: impl Into<Point>) -> Self {
        self.icon_anchor = Some(anchor.into());
        self
    }

    pub fn with_popup_anchor(mut self, anchor: impl Into<Point>) -> Self {
        self.popup_anchor = Some(anchor.into());
        self
    }

    pub fn with_shadow(
        mut self,
        url: impl Into<String>,
        size: impl Into<Point>,
        anchor: impl Into<Point>,
    ) -> Self {
        self.shadow_url = Some(url.into());
        self.shadow_size = Some(size.into());
        self.shadow_anchor = Some(anchor.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_coordinates_are_normalized() {
        let icon: IconDescriptor = toml::from_str(
            r#"
            iconUrl = "/files/icon.png"
            iconSize = { x = "20", y = "40" }
            popupAnchor = { x = "-8", y = -32 }
            "#,
        )
        .unwrap();

        assert_eq!(icon.icon_size, Some(Point::new(20, 40)));
        assert_eq!(icon.popup_anchor, Some(Point::new(-8, -32)));
        assert_eq!(icon.shadow_size, None);
    }

    #[test]
    fn test_half_point_is_rejected() {
        let result: Result<IconDescriptor, _> = toml::from_str(
            r#"
            iconSize = { x = 20 }
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_half_point_with_bad_component_is_rejected() {
        let result: Result<IconDescriptor, _> = toml::from_str(
            r#"
            shadowSize = { y = "tall" }
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_shapes_are_kept_opaquely() {
        let icon: IconDescriptor = toml::from_str(
            r#"
            iconUrl = 5
            iconSize = "20x40"
            iconAnchor = { x = "left", y = 0 }
            shadowUrl = "/files/shadow.png"
            "#,
        )
        .unwrap();

        assert_eq!(icon.icon_url, None);
        assert_eq!(icon.icon_size, None);
        assert_eq!(icon.icon_anchor, None);
        assert_eq!(icon.shadow_url.as_deref(), Some("/files/shadow.png"));
        assert_eq!(icon.extra.get("iconUrl"), Some(&Value::Integer(5)));
        assert_eq!(
            icon.extra.get("iconSize"),
            Some(&Value::String("20x40".into()))
        );

        let json = serde_json::to_value(&icon).unwrap();
        assert_eq!(json["iconUrl"], 5);
        assert_eq!(json["iconSize"], "20x40");
        assert_eq!(json["iconAnchor"]["x"], "left");
    }

    #[test]
    fn test_unknown_icon_keys_pass_through() {
        let icon: IconDescriptor = toml::from_str(
            r#"
            iconUrl = "/files/icon.png"
            className = "cluster-big"
            "#,
        )
        .unwrap();
        assert_eq!(
            icon.extra.get("className"),
            Some(&Value::String("cluster-big".into()))
        );

        let json = serde_json::to_value(&icon).unwrap();
        assert_eq!(json["className"], "cluster-big");
        assert_eq!(json["iconUrl"], "/files/icon.png");
    }
}
