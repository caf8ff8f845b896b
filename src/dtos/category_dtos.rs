use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CategoryIn {
    pub name: String,
}
