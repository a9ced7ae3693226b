//! Reader for the main section of `META-INF/MANIFEST.MF`.

use crate::consts::{AUTOMATIC_UNIT_NAME, MULTI_RELEASE, UNIT_LAYER};

/// Main-section attributes of a manifest.
///
/// Attribute names compare case-insensitively. Only the main section (up to
/// the first blank line) is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
  attributes: Vec<(String, String)>,
}

impl Manifest {
  pub fn parse(text: &str) -> Self {
    let mut attributes: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
      if line.is_empty() {
        break;
      }

      // Continuation of the previous value
      if let Some(rest) = line.strip_prefix(' ') {
        if let Some((_, value)) = attributes.last_mut() {
          value.push_str(rest);
        }
        continue;
      }

      let Some((name, value)) = line.split_once(':') else {
        continue;
      };
      let name = name.trim();
      if name.is_empty() {
        continue;
      }
      let value = value.strip_prefix(' ').unwrap_or(value);
      attributes.push((name.to_string(), value.to_string()));
    }

    Self { attributes }
  }

  pub fn from_bytes(data: &[u8]) -> Self {
    Self::parse(&String::from_utf8_lossy(data))
  }

  /// Look up a main attribute. The first occurrence wins.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(key, _)| key.eq_ignore_ascii_case(name))
      .map(|(_, value)| value.trim())
  }

  pub fn is_multi_release(&self) -> bool {
    self
      .get(MULTI_RELEASE)
      .is_some_and(|value| value.eq_ignore_ascii_case("true"))
  }

  pub fn automatic_name(&self) -> Option<&str> {
    self.get(AUTOMATIC_UNIT_NAME).filter(|name| !name.is_empty())
  }

  pub fn layer(&self) -> Option<&str> {
    self.get(UNIT_LAYER).filter(|layer| !layer.is_empty())
  }
}
