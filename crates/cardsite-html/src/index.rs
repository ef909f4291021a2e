use std::{
  fs,
  path::{Path, PathBuf},
};

use cardsite_config::{Config, site::SiteConfig};
use color_eyre::eyre::{Context as _, Result, bail};
use jiff::civil::DateTime;
use log::{debug, info};
use serde::Serialize;
use tera::Context;

use crate::template::{self, Templates, escape};

/// One season's table fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
  /// Season name, taken from the file name without its extension.
  pub name:    String,
  pub content: String,
}

/// Row counts of one assembled section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCount {
  pub rows:  usize,
  /// Rows of this and every earlier section.
  pub total: usize,
}

/// The assembled index page.
#[derive(Debug, Clone)]
pub struct AssembledIndex {
  pub html:     String,
  /// One entry per fragment, in input order.
  pub sections: Vec<SectionCount>,
}

impl AssembledIndex {
  #[must_use]
  pub fn total_rows(&self) -> usize {
    self.sections.last().map_or(0, |s| s.total)
  }
}

/// List the fragment files of `content_dir`, sorted by file name.
///
/// Subdirectories and hidden files are ignored. The order decides the running
/// totals, so it must not depend on the filesystem.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn discover_fragments(content_dir: &Path) -> Result<Vec<PathBuf>> {
  if !content_dir.is_dir() {
    bail!("Content directory {} does not exist", content_dir.display());
  }

  let mut paths = Vec::new();
  for entry in fs::read_dir(content_dir).wrap_err_with(|| {
    format!("Failed to read content directory {}", content_dir.display())
  })? {
    let entry = entry?;
    let path = entry.path();
    let hidden = entry.file_name().to_string_lossy().starts_with('.');
    if path.is_file() && !hidden {
      paths.push(path);
    }
  }

  paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
  debug!("Found {} season fragments", paths.len());
  Ok(paths)
}

/// Read every fragment of `content_dir` in [`discover_fragments`] order.
///
/// # Errors
///
/// Returns an error if the directory or any fragment cannot be read.
pub fn read_fragments(content_dir: &Path) -> Result<Vec<Fragment>> {
  discover_fragments(content_dir)?
    .into_iter()
    .map(|path| -> Result<Fragment> {
      let content = fs::read_to_string(&path).wrap_err_with(|| {
        format!("Failed to read fragment {}", path.display())
      })?;
      let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
      Ok(Fragment { name, content })
    })
    .collect()
}

/// Number of data rows in a fragment: every `<tr>` opening but the header's.
#[must_use]
pub fn count_rows(content: &str) -> usize {
  content
    .match_indices("<tr")
    .filter(|(at, _)| {
      content[at + 3..]
        .chars()
        .next()
        .is_some_and(|c| c == '>' || c.is_ascii_whitespace())
    })
    .count()
    .saturating_sub(1)
}

/// Table lines of a fragment, trimmed and concatenated.
///
/// Only lines with a cell, a row or a closing table tag survive. The opening
/// `<table>` is dropped, the section header supplies its own.
fn table_lines(content: &str) -> String {
  content
    .lines()
    .filter(|line| {
      ["</t", "<td", "<tr", "<th"]
        .iter()
        .any(|marker| line.contains(marker))
    })
    .map(str::trim)
    .collect()
}

#[derive(Serialize)]
struct RelatedPage {
  href:  String,
  title: String,
  label: String,
}

/// Builds the collection overview from season fragments.
pub struct IndexAssembler<'a> {
  templates: &'a Templates,
  site:      SiteConfig,
}

impl<'a> IndexAssembler<'a> {
  #[must_use]
  pub fn new(templates: &'a Templates, config: &Config) -> Self {
    Self {
      templates,
      site: config.site(),
    }
  }

  /// Concatenate `fragments` under the index shell.
  ///
  /// Each section heading carries its own row count and the running total
  /// over all sections so far, in input order. `generated_at` is printed in
  /// the page footer.
  ///
  /// # Errors
  ///
  /// Returns an error if the template fails to render.
  pub fn assemble(
    &self,
    fragments: &[Fragment],
    generated_at: DateTime,
  ) -> Result<AssembledIndex> {
    let subject = escape(&self.site.subject);

    let mut anchors = String::new();
    for fragment in fragments {
      let name = escape(&fragment.name);
      anchors.push_str(&format!(
        " | <a href=#{name} title='{subject} Trading Cards from Season: \
         {name}'>{name}</a> "
      ));
    }
    anchors.push_str(" |");

    let mut sections_html = String::new();
    let mut sections = Vec::with_capacity(fragments.len());
    let mut total = 0;
    for fragment in fragments {
      let rows = count_rows(&fragment.content);
      total += rows;
      sections.push(SectionCount { rows, total });

      let name = escape(&fragment.name);
      sections_html.push_str(&format!(
        "<h2><a title='{subject} Trading Cards for Season {name}' \
         id={name}>{name}</a> [This Season: {rows} | Total: {total}]</h2><a \
         href=\"#top\" title='Back to the top of the list'>top</a><table>{}\n",
        table_lines(&fragment.content)
      ));
      info!("Season {}: {rows} cards, {total} in total", fragment.name);
    }

    let related_pages: Vec<RelatedPage> = self
      .site
      .related_pages
      .iter()
      .map(|page| RelatedPage {
        href:  escape(&page.href),
        title: escape(&page.title),
        label: escape(&page.label),
      })
      .collect();

    let mut context = Context::new();
    context.insert("title", &escape(&self.site.index_title));
    context.insert("description", &escape(&self.site.index_description));
    context.insert("head_html", &self.templates.render_head(&self.site, "")?);
    context.insert(
      "heading",
      &format!("List of {subject} Basketball Trading Cards"),
    );
    context.insert("anchors_html", &anchors);
    context.insert("sections_html", &sections_html);
    context.insert("related_pages", &related_pages);
    context.insert(
      "generated_at",
      &generated_at.strftime("%d.%m.%Y %H:%M:%S").to_string(),
    );

    let html = self.templates.render(template::INDEX, &context)?;
    Ok(AssembledIndex { html, sections })
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use jiff::civil::date;

  use super::*;

  const HEADER: &str = "<tr><th>Player</th><th>Season</th></tr>";

  fn fragment(name: &str, rows: usize) -> Fragment {
    let mut content = format!("<table>\n{HEADER}\n");
    for n in 0..rows {
      content.push_str(&format!(
        "<tr>\n  <td>Juwan Howard</td>\n  <td>{name}</td>\n</tr>\n<!-- {n} -->\n"
      ));
    }
    content.push_str("</table>\n");
    Fragment {
      name: name.to_string(),
      content,
    }
  }

  #[test]
  fn test_count_rows() {
    assert_eq!(count_rows(&fragment("1997-98", 3).content), 3);
    assert_eq!(count_rows(&fragment("1997-98", 0).content), 0);
    assert_eq!(count_rows(""), 0);
    assert_eq!(
      count_rows("<tr class=\"h\"><th>A</th></tr><tr>\t<td>1</td></tr>"),
      1
    );
    // <track> and <tr-ish> are not rows
    assert_eq!(count_rows("<tr><th>A</th></tr><track><tr-x>"), 0);
  }

  #[test]
  fn test_table_lines_drop_table_opening_and_noise() {
    let lines = table_lines(&fragment("1997-98", 1).content);
    assert_eq!(
      lines,
      format!(
        "{HEADER}<tr><td>Juwan Howard</td><td>1997-98</td></tr></table>"
      )
    );
  }

  #[test]
  fn test_running_totals() {
    let templates = Templates::embedded().unwrap();
    let assembler = IndexAssembler::new(&templates, &Config::default());

    let index = assembler
      .assemble(
        &[fragment("1994-95", 1), fragment("1995-96", 2)],
        date(2026, 3, 1).at(14, 5, 9, 0),
      )
      .unwrap();

    assert_eq!(index.sections, [
      SectionCount { rows: 1, total: 1 },
      SectionCount { rows: 2, total: 3 },
    ]);
    assert_eq!(index.total_rows(), 3);

    let first = index.html.find("[This Season: 1 | Total: 1]").unwrap();
    let second = index.html.find("[This Season: 2 | Total: 3]").unwrap();
    assert!(first < second);

    assert!(index.html.contains(
      " | <a href=#1994-95 title='Juwan Howard Trading Cards from Season: \
       1994-95'>1994-95</a>  | <a href=#1995-96"
    ));
    assert!(index.html.contains("List Created: 01.03.2026 14:05:09"));
    assert!(index.html.contains("List of Juwan Howard Basketball Trading Cards"));
    assert!(index.html.contains("<h3>Other Collections</h3>"));
    assert!(index.html.contains(r#"href="Wantlist.html""#));
  }

  #[test]
  fn test_discover_fragments_sorted() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["2001-02.html", "1994-95.html", ".DS_Store", "1997-98.htm"] {
      fs::write(dir.path().join(name), HEADER).unwrap();
    }
    fs::create_dir(dir.path().join("drafts")).unwrap();

    let names: Vec<String> = discover_fragments(dir.path())
      .unwrap()
      .iter()
      .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
      .collect();
    assert_eq!(names, ["1994-95.html", "1997-98.htm", "2001-02.html"]);

    let fragments = read_fragments(dir.path()).unwrap();
    assert_eq!(fragments[0].name, "1994-95");
    assert_eq!(fragments[1].name, "1997-98");
  }

  #[test]
  fn test_missing_content_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(discover_fragments(&dir.path().join("missing")).is_err());
  }
}
