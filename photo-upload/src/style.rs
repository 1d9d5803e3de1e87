//! Inline style of the tappable container.
//!
//! Styles are plain CSS declaration lists (`"flex: 1; padding: 8px;"`). A
//! caller style is merged over [`DEFAULT_CONTAINER_STYLE`] property by property;
//! the default itself is never changed.

/// Centers the children of the container and lets it grow
pub const DEFAULT_CONTAINER_STYLE: &str =
    "display: flex; flex: 1; flex-direction: column; justify-content: center; align-items: center;";

fn declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (property, value) = decl.split_once(':')?;
        let property = property.trim();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            None
        } else {
            Some((property, value))
        }
    })
}

/// Merges `custom` over `base`.
///
/// A property present in both keeps its position in `base` with the value from
/// `custom`; properties only in `custom` are appended in their order.
pub fn merge_style(base: &str, custom: Option<&str>) -> String {
    let mut merged: Vec<(String, String)> = declarations(base)
        .map(|(p, v)| (p.to_ascii_lowercase(), v.to_string()))
        .collect();

    for (property, value) in declarations(custom.unwrap_or_default()) {
        let property = property.to_ascii_lowercase();
        match merged.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value.to_string(),
            None => merged.push((property, value.to_string())),
        }
    }

    merged
        .iter()
        .map(|(p, v)| format!("{}: {};", p, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Container style for a component given its optional caller style
pub fn container_style(custom: Option<&str>) -> String {
    merge_style(DEFAULT_CONTAINER_STYLE, custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_normalized() {
        assert_eq!(container_style(None), DEFAULT_CONTAINER_STYLE);
    }

    #[test]
    fn test_custom_overrides_in_place_and_appends() {
        let style = merge_style(
            "display: flex; align-items: center;",
            Some("Align-Items: flex-start; border-radius: 50%;"),
        );
        assert_eq!(
            style,
            "display: flex; align-items: flex-start; border-radius: 50%;"
        );
    }

    #[test]
    fn test_malformed_declarations_are_skipped() {
        let style = merge_style("flex: 1;", Some("garbage; color:; : red; width: 120px"));
        assert_eq!(style, "flex: 1; width: 120px;");
    }
}
