use std::collections::HashMap;

pub const CARD_TEMPLATE: &str = include_str!("../templates/card.html");
pub const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
pub const HEAD_TEMPLATE: &str = include_str!("../templates/head.html");

#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("card.html", CARD_TEMPLATE);
  templates.insert("index.html", INDEX_TEMPLATE);
  templates.insert("head.html", HEAD_TEMPLATE);
  templates
}
