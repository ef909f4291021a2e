use std::path::Path;

/// Calculate the relative path prefix needed to reach the root from a given
/// file path. For example: "index.html" returns "" and
/// "cards/1997-98/card.html" returns "../../".
#[must_use]
pub fn calculate_root_relative_path(file_rel_path: &Path) -> String {
  let depth = file_rel_path.components().count();
  if depth <= 1 {
    String::new() // file is at root level
  } else {
    "../".repeat(depth - 1)
  }
}
