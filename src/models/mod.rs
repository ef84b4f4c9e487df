pub mod auth;
pub mod envelope;
pub mod grocery;
pub mod recipe;
pub mod weekly_menu;

use serde::{Deserialize, Deserializer};

/// For patch fields that can be cleared: missing keeps the current value
/// (`None`), `null` clears it (`Some(None)`), a value replaces it.
/// Use together with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
