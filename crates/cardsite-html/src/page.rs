//! Card detail pages.
//!
//! [`CardPageRenderer::render`] is a pure function of the card, its table
//! neighbours and the table itself: the same input always yields the same
//! bytes. Card values are escaped before they reach the template.

use std::{path::Path, ptr};

use cardsite_catalog::{Card, is_valid, record::fields};
use cardsite_config::{Config, site::SiteConfig};
use cardsite_utils::html::calculate_root_relative_path;
use color_eyre::eyre::{Context as _, Result};
use serde::Serialize;
use serde_json::json;
use tera::Context;

use crate::template::{self, Templates, escape};

/// Number of other cards listed under "More from the … Collection".
pub const RELATED_LIMIT: usize = 6;

#[derive(Debug, Serialize)]
struct NavLink {
  href:  String,
  title: String,
}

#[derive(Debug, Serialize)]
struct Nav {
  overview_href: String,
  prev:          Option<NavLink>,
  next:          Option<NavLink>,
}

#[derive(Debug, Serialize)]
struct Image {
  src:      String,
  alt:      String,
  title:    String,
  flip_src: String,
  caption:  &'static str,
}

#[derive(Debug, Serialize)]
struct SpecRow {
  label: &'static str,
  value: String,
}

#[derive(Debug, Serialize)]
struct FaqItem {
  question: String,
  answer:   String,
}

#[derive(Debug, Serialize)]
struct RelatedLink {
  href:  String,
  title: String,
  label: String,
}

/// Renders one HTML document per card.
pub struct CardPageRenderer<'a> {
  templates:     &'a Templates,
  site:          SiteConfig,
  images_folder: String,
}

impl<'a> CardPageRenderer<'a> {
  #[must_use]
  pub fn new(templates: &'a Templates, config: &Config) -> Self {
    Self {
      templates,
      site: config.site(),
      images_folder: config.images_folder.trim_matches('/').to_string(),
    }
  }

  /// Render the detail page of `card`.
  ///
  /// `prev` and `next` are the neighbours in table order, `all` is the whole
  /// table `card` belongs to. `card` must point into `all`: it is left out of
  /// the related links by identity, so duplicate rows still list each other.
  ///
  /// # Errors
  ///
  /// Returns an error if a template fails to render.
  pub fn render(
    &self,
    card: &Card,
    prev: Option<&Card>,
    next: Option<&Card>,
    all: &[Card],
  ) -> Result<String> {
    let root_prefix =
      calculate_root_relative_path(Path::new(&card.identity.full_path));

    let h1 = heading(card);
    let description = meta_description(card);

    let front = format!(
      "{root_prefix}{}",
      card.identity.image_path(&self.images_folder, "front")
    );
    let back = format!(
      "{root_prefix}{}",
      card.identity.image_path(&self.images_folder, "back")
    );

    let mut context = Context::new();
    context.insert(
      "title",
      &escape(&format!("{h1} | {}", self.site.collection_title)),
    );
    context.insert("description", &escape(&description));
    context.insert(
      "canonical_url",
      &escape(&self.site.url_for(&card.identity.full_path)),
    );
    context.insert(
      "head_html",
      &self.templates.render_head(&self.site, &root_prefix)?,
    );
    context.insert("json_ld", &self.json_ld(card, &h1, &description)?);
    context.insert("nav", &Nav {
      overview_href: format!("{root_prefix}index.html"),
      prev:          prev.map(|p| NavLink {
        href:  escape(&sibling_href(card, p)),
        title: escape(&format!(
          "Go to previous card: {} {}",
          p.get(fields::SEASON),
          p.get(fields::BRAND)
        )),
      }),
      next:          next.map(|n| NavLink {
        href:  escape(&sibling_href(card, n)),
        title: escape(&format!(
          "Go to next card: {} {}",
          n.get(fields::SEASON),
          n.get(fields::BRAND)
        )),
      }),
    });
    context.insert("h1", &escape(&h1));
    context.insert(
      "sub_title",
      &escape(&format!(
        "{} {} {}",
        card.get(fields::SEASON),
        card.get(fields::COMPANY),
        card.get(fields::BRAND)
      )),
    );
    context.insert(
      "meta_info",
      &format!(
        "{} &bull; {} &bull; #{}",
        escape(card.get(fields::THEME)),
        escape(card.get(fields::VARIANT)),
        escape(card.get(fields::NUMBER))
      ),
    );
    context.insert("about_html", &self.about_html(card));
    context.insert("images", &[
      Image {
        src:      escape(&front),
        alt:      escape(&self.alt_text(card, Side::Front)),
        title:    escape(&image_title(card, "Front")),
        flip_src: escape(&back),
        caption:  "Front View (Click to Zoom)",
      },
      Image {
        src:      escape(&back),
        alt:      escape(&self.alt_text(card, Side::Back)),
        title:    escape(&image_title(card, "Back")),
        flip_src: escape(&front),
        caption:  "Back View (Click to Zoom)",
      },
    ]);
    context.insert("spec_rows", &spec_rows(card));
    context.insert("faq", &self.faq(card));
    context.insert("season", &escape(card.get(fields::SEASON)));
    context.insert("related", &related(card, all));
    context.insert("copyright", &self.site.copyright);

    self.templates.render(template::CARD, &context)
  }

  fn alt_text(&self, card: &Card, side: Side) -> String {
    let base = format!(
      "{} {} {} #{}",
      self.site.subject,
      card.get(fields::SEASON),
      card.get(fields::BRAND),
      card.get(fields::NUMBER)
    );
    match side {
      Side::Front => format!(
        "Front view of {base} basketball card - {} edition ({})",
        card.get(fields::VARIANT),
        card.get(fields::TEAM)
      ),
      Side::Back => format!(
        "Back view of {base} showing stats for {}",
        card.get(fields::TEAM)
      ),
    }
  }

  /// The "About this Card" paragraph. Returns HTML.
  fn about_html(&self, card: &Card) -> String {
    let get = |key: &str| escape(card.get(key));

    let mut text = format!(
      "This unique <strong>{}</strong> basketball card is a highlight of the \
       <strong>{}</strong> season. Produced by {} as part of the \
       <strong>{}</strong> set, this specific card features the \
       <strong>{}</strong> theme. ",
      get(fields::PLAYER),
      get(fields::SEASON),
      get(fields::COMPANY),
      get(fields::BRAND),
      get(fields::THEME)
    );

    let variant = card.get(fields::VARIANT).to_lowercase();
    if variant.contains("refractor") || variant.contains("gold") {
      text.push_str(&format!(
        "Collectors particularly appreciate the {} finish, making it a \
         standout piece. ",
        get(fields::VARIANT)
      ));
    } else {
      text.push_str(&format!("It is the {} version. ", get(fields::VARIANT)));
    }

    if card.has(fields::SERIAL) {
      text.push_str(&format!(
        "This is a limited edition card, serial numbered \
         <strong>{}</strong> out of a total print run of \
         <strong>{}</strong>. ",
        get(fields::SERIAL),
        get(fields::PRINT_RUN)
      ));
      if is_one_of_one(card) {
        text.push_str("It is a true <strong>One of One</strong> masterpiece. ");
      }
    }

    if card.record.is_yes(fields::AUTOGRAPH) {
      text.push_str(
        "Notably, this card features an authentic <strong>Autograph</strong>, \
         significantly adding to its rarity and value. ",
      );
    }

    if card.record.is_yes(fields::GAME_USED) {
      text.push_str(
        "It also contains a piece of <strong>Game Used \
         Memorabilia</strong> (Jersey/Patch). ",
      );
    }

    text.push_str(&format!(
      "It captures {} during his time with the {}.",
      escape(&self.site.subject),
      get(fields::TEAM)
    ));
    text
  }

  fn faq(&self, card: &Card) -> Vec<FaqItem> {
    let item = |question: &str, answer: String| FaqItem {
      question: escape(question),
      answer:   escape(&answer),
    };

    let mut faq = Vec::with_capacity(5);

    if card.has(fields::SERIAL) {
      faq.push(item(
        "How rare is this specific card?",
        format!(
          "This card is serially numbered {} out of a total print run of {}.",
          card.get(fields::SERIAL),
          card.get(fields::PRINT_RUN)
        ),
      ));
    } else {
      faq.push(item(
        "Is this card numbered?",
        "No, this version of the card was not serial numbered by the \
         manufacturer."
          .to_string(),
      ));
    }

    let rookie = if card.record.is_yes(fields::ROOKIE) {
      format!(
        "Yes, this is an official Rookie Card (RC) from the {} class!",
        card.get(fields::SEASON)
      )
    } else {
      format!(
        "No, this is a veteran card released during the {} season.",
        card.get(fields::SEASON)
      )
    };
    faq.push(item("Is this a Rookie Card?", rookie));

    if card.record.is_yes(fields::AUTOGRAPH) {
      faq.push(item(
        "Is the autograph authentic?",
        format!(
          "Yes, this card features a manufacturer-certified autograph \
           guaranteed by {}.",
          card.get(fields::COMPANY)
        ),
      ));
    }

    if card.has(fields::GRADE) {
      faq.push(item(
        "What is the condition of this card?",
        format!(
          "This card has been professionally graded by {} and received a \
           grade of {}.",
          card.get(fields::GRADING_CO),
          card.get(fields::GRADE)
        ),
      ));
    }

    faq.push(item(
      &format!(
        "Which team did {} play for on this card?",
        self.site.subject
      ),
      format!(
        "This card features {} in a {} uniform.",
        self.site.subject,
        card.get(fields::TEAM)
      ),
    ));

    faq
  }

  /// Product and FAQPage structured data, ready to sit inside a
  /// `<script type="application/ld+json">` element.
  fn json_ld(
    &self,
    card: &Card,
    name: &str,
    description: &str,
  ) -> Result<String> {
    let image = self
      .site
      .url_for(&card.identity.image_path(&self.images_folder, "front"));

    let sku_variant: String = card
      .get(fields::VARIANT)
      .chars()
      .filter(char::is_ascii_alphanumeric)
      .collect();

    let mut questions = vec![json!({
      "@type": "Question",
      "name": "What is the serial number?",
      "acceptedAnswer": {
        "@type": "Answer",
        "text": format!(
          "{} / {}",
          card.get(fields::SERIAL),
          card.get(fields::PRINT_RUN)
        ),
      },
    })];
    if card.has(fields::GRADE) {
      questions.push(json!({
        "@type": "Question",
        "name": "Is this card graded?",
        "acceptedAnswer": {
          "@type": "Answer",
          "text": format!(
            "Yes, {} {}",
            card.get(fields::GRADING_CO),
            card.get(fields::GRADE)
          ),
        },
      }));
    }

    let graph = json!({
      "@context": "https://schema.org",
      "@graph": [
        {
          "@type": "Product",
          "image": image,
          "name": name,
          "description": description,
          "brand": { "@type": "Brand", "name": card.get(fields::BRAND) },
          "manufacturer": card.get(fields::COMPANY),
          "sku": format!("{}-{sku_variant}", card.get(fields::NUMBER)),
          "category": "Sports Card",
          "offers": {
            "@type": "Offer",
            "availability": "https://schema.org/SoldOut",
            "price": "0",
            "priceCurrency": "EUR",
            "description": "Private Collection (NFS)",
          },
        },
        {
          "@type": "FAQPage",
          "mainEntity": questions,
        },
      ],
    });

    let json = serde_json::to_string_pretty(&graph)
      .wrap_err("Failed to serialize structured data")?;
    // keeps "</script>" and markup in card values from ending the element
    Ok(json.replace('<', "\\u003c"))
  }
}

#[derive(Clone, Copy)]
enum Side {
  Front,
  Back,
}

/// Page heading: season, brand, player, theme, variant and number.
///
/// The theme is left out when absent or already part of the brand, the
/// number when absent.
#[must_use]
pub fn heading(card: &Card) -> String {
  let number = card
    .has(fields::NUMBER)
    .then(|| format!("#{}", card.get(fields::NUMBER)));

  let mut parts = vec![
    card.get(fields::SEASON),
    card.get(fields::BRAND),
    card.get(fields::PLAYER),
  ];

  let theme = card.get(fields::THEME);
  if card.has(fields::THEME) && !card.get(fields::BRAND).contains(theme) {
    parts.push(theme);
  }
  parts.push(card.get(fields::VARIANT));
  if let Some(number) = number.as_deref() {
    parts.push(number);
  }

  parts
    .iter()
    .flat_map(|part| part.split_whitespace())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Meta description of a detail page.
#[must_use]
pub fn meta_description(card: &Card) -> String {
  let mut text = format!(
    "Details for the {} {} {} card #{} ({}). Variant: {}. ",
    card.get(fields::SEASON),
    card.get(fields::BRAND),
    card.get(fields::PLAYER),
    card.get(fields::NUMBER),
    card.get(fields::TEAM),
    card.get(fields::VARIANT)
  );
  if card.has(fields::SERIAL) {
    text.push_str(&format!(
      "Numbered: {}/{}. ",
      card.get(fields::SERIAL),
      card.get(fields::PRINT_RUN)
    ));
  }
  if card.has(fields::GRADE) {
    text.push_str(&format!(
      "Graded: {} {}. ",
      card.get(fields::GRADING_CO),
      card.get(fields::GRADE)
    ));
  }
  text.push_str("View high-res images and specs.");
  text
}

fn is_one_of_one(card: &Card) -> bool {
  card.get(fields::SERIAL) == "1/1" || card.get(fields::PRINT_RUN) == "1"
}

fn image_title(card: &Card, side: &str) -> String {
  format!(
    "{side} scan of {} {} ({})",
    card.get(fields::PLAYER),
    card.get(fields::BRAND),
    card.get(fields::SEASON)
  )
}

/// Link from one detail page to another.
fn sibling_href(from: &Card, to: &Card) -> String {
  if from.identity.season_folder == to.identity.season_folder {
    to.identity.filename()
  } else {
    format!("../{}/{}", to.identity.season_folder, to.identity.filename())
  }
}

fn spec_rows(card: &Card) -> Vec<SpecRow> {
  let row = |label, value: &str| SpecRow {
    label,
    value: if is_valid(value) {
      escape(value)
    } else {
      "-".to_string()
    },
  };

  let serial_info = if is_valid(card.get(fields::SERIAL)) {
    format!(
      "{} / {}",
      card.get(fields::SERIAL),
      card.get(fields::PRINT_RUN)
    )
  } else {
    "Not numbered".to_string()
  };

  let mut rows = vec![
    row("Season", card.get(fields::SEASON)),
    row("Team", card.get(fields::TEAM)),
    row("Manufacturer", card.get(fields::COMPANY)),
    row("Brand", card.get(fields::BRAND)),
    row("Theme", card.get(fields::THEME)),
    row("Variant", card.get(fields::VARIANT)),
    row("Card Number", card.get(fields::NUMBER)),
    row("Serial / Print Run", &serial_info),
    row("Rookie Card", card.get(fields::ROOKIE)),
    row("Memorabilia", card.get(fields::GAME_USED)),
    row("Autograph", card.get(fields::AUTOGRAPH)),
  ];

  let grading = format!(
    "{} {}",
    card.get(fields::GRADING_CO),
    card.get(fields::GRADE)
  );
  let grading = grading.trim();
  if grading.len() > 1 && grading != "null null" {
    rows.push(row("Grading", grading));
  }

  rows
}

fn related(card: &Card, all: &[Card]) -> Vec<RelatedLink> {
  all
    .iter()
    .filter(|other| !ptr::eq(*other, card))
    .take(RELATED_LIMIT)
    .map(|other| RelatedLink {
      href:  escape(&sibling_href(card, other)),
      title: escape(&format!(
        "View card details: {} {} {}",
        other.get(fields::SEASON),
        other.get(fields::BRAND),
        other.get(fields::VARIANT)
      )),
      label: escape(&format!(
        "{} #{} {}",
        other.get(fields::BRAND),
        other.get(fields::NUMBER),
        other.get(fields::VARIANT)
      )),
    })
    .collect()
}
