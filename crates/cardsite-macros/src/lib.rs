//! Proc-macros for the cardsite configuration system.
//!
//! `#[derive(Configurable)]` generates two inherent methods on a named-field
//! struct:
//!
//! - `apply_override(key, value)` assigns a single field from a string, as
//!   passed on the command line via `--config KEY=VALUE`. Dotted keys are
//!   forwarded into `#[config(nested)]` sections.
//! - `merge_fields(other)` folds a later configuration source into this one.
//!
//! The generated code refers to `crate::error::ConfigError`, so the derive is
//! only usable inside the configuration crate.

use proc_macro::TokenStream;
use quote::{ToTokens, quote};
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Type, parse_macro_input};

/// Parsed `#[config(...)]` attribute of a single field.
#[derive(Default)]
struct FieldAttrs {
  /// Override key; defaults to the field name.
  key: Option<String>,

  /// Field holds an `Option<Section>` addressed by dotted keys.
  nested: bool,

  /// An empty value resets an `Option` field to `None`.
  allow_empty: bool,

  /// Field was explicitly marked with `#[config]`.
  marked: bool,
}

impl FieldAttrs {
  fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
    let mut parsed = Self::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("config")) {
      parsed.marked = true;

      // Bare `#[config]` carries no arguments
      if matches!(attr.meta, syn::Meta::Path(_)) {
        continue;
      }

      attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("key") {
          let lit: syn::LitStr = meta.value()?.parse()?;
          parsed.key = Some(lit.value());
        } else if meta.path.is_ident("nested") {
          parsed.nested = true;
        } else if meta.path.is_ident("allow_empty") {
          parsed.allow_empty = true;
        } else {
          return Err(meta.error("unsupported config attribute"));
        }
        Ok(())
      })?;
    }

    Ok(parsed)
  }
}

/// Shape of a field type, as far as override parsing is concerned.
enum FieldKind {
  Bool,
  Text,
  Path,
  Number(&'static str),
  Optional(Box<FieldKind>),
  Collection,
  Other,
}

impl FieldKind {
  fn classify(ty: &Type) -> Self {
    let rendered = ty.to_token_stream().to_string().replace(' ', "");

    if let Some(inner) = rendered
      .strip_prefix("Option<")
      .and_then(|rest| rest.strip_suffix('>'))
    {
      return Self::Optional(Box::new(Self::classify_name(inner)));
    }

    Self::classify_name(&rendered)
  }

  fn classify_name(name: &str) -> Self {
    match name {
      "bool" => Self::Bool,
      "String" => Self::Text,
      "PathBuf" | "std::path::PathBuf" => Self::Path,
      "u8" | "u16" | "u32" | "u64" | "usize" => {
        Self::Number("a non-negative integer")
      },
      "i32" | "i64" => Self::Number("an integer"),
      "f32" | "f64" => Self::Number("a number"),
      _ if name.starts_with("Vec<") || name.contains("HashMap<") => {
        Self::Collection
      },
      _ => Self::Other,
    }
  }
}

/// Derive macro for configuration structs.
#[proc_macro_derive(Configurable, attributes(config))]
pub fn derive_configurable(input: TokenStream) -> TokenStream {
  let input = parse_macro_input!(input as DeriveInput);

  match expand(&input) {
    Ok(tokens) => tokens.into(),
    Err(err) => err.to_compile_error().into(),
  }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
  let name = &input.ident;
  let (impl_generics, ty_generics, where_clause) =
    input.generics.split_for_impl();

  let Data::Struct(data) = &input.data else {
    return Err(syn::Error::new_spanned(
      input,
      "Configurable can only be derived for structs",
    ));
  };

  let Fields::Named(fields) = &data.fields else {
    return Err(syn::Error::new_spanned(
      input,
      "Configurable requires named fields",
    ));
  };

  let mut override_arms = Vec::new();
  let mut merge_steps = Vec::new();

  for field in &fields.named {
    let Some(ident) = field.ident.as_ref() else {
      continue;
    };
    let attrs = FieldAttrs::from_attrs(&field.attrs)?;
    let kind = FieldKind::classify(&field.ty);

    if attrs.marked {
      let key = attrs.key.clone().unwrap_or_else(|| ident.to_string());
      override_arms.push(override_arm(ident, &key, &kind, &attrs));
    }
    merge_steps.push(merge_step(ident, &kind, attrs.nested));
  }

  Ok(quote! {
    impl #impl_generics #name #ty_generics #where_clause {
      /// Apply a configuration override by key.
      ///
      /// # Errors
      ///
      /// Returns an error if the key is unknown or the value cannot be parsed
      /// into the field's type.
      pub fn apply_override(
        &mut self,
        key: &str,
        value: &str,
      ) -> std::result::Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError;

        #(#override_arms)*

        Err(ConfigError::UnknownKey(key.to_string()))
      }

      /// Merge another config into this one, the other side winning.
      pub fn merge_fields(&mut self, other: Self) {
        #(#merge_steps)*
      }
    }
  })
}

fn override_arm(
  ident: &Ident,
  key: &str,
  kind: &FieldKind,
  attrs: &FieldAttrs,
) -> proc_macro2::TokenStream {
  if attrs.nested {
    let prefix = format!("{key}.");
    return quote! {
      if let Some(subkey) = key.strip_prefix(#prefix) {
        return self
          .#ident
          .get_or_insert_with(Default::default)
          .apply_override(subkey, value);
      }
    };
  }

  let assignment = match kind {
    FieldKind::Collection => return quote! {},
    FieldKind::Optional(inner) if matches!(**inner, FieldKind::Collection) => {
      return quote! {};
    },
    FieldKind::Optional(inner) => {
      let parsed = parse_value(key, inner);
      if attrs.allow_empty {
        quote! {
          self.#ident = if value.is_empty() { None } else { Some(#parsed) };
        }
      } else {
        quote! { self.#ident = Some(#parsed); }
      }
    },
    plain => {
      let parsed = parse_value(key, plain);
      quote! { self.#ident = #parsed; }
    },
  };

  quote! {
    if key == #key {
      #assignment
      return Ok(());
    }
  }
}

/// Expression converting `value: &str` into the field type.
fn parse_value(key: &str, kind: &FieldKind) -> proc_macro2::TokenStream {
  match kind {
    FieldKind::Bool => {
      quote! {
        match value.to_ascii_lowercase().as_str() {
          "true" | "yes" | "1" => true,
          "false" | "no" | "0" => false,
          _ => {
            return Err(ConfigError::InvalidValue {
              key:      #key.to_string(),
              value:    value.to_string(),
              expected: "true/false, yes/no or 1/0",
            });
          },
        }
      }
    },
    FieldKind::Text => quote! { value.to_string() },
    FieldKind::Path => quote! { std::path::PathBuf::from(value) },
    FieldKind::Number(expected) => {
      quote! {
        value.parse().map_err(|_| ConfigError::InvalidValue {
          key:      #key.to_string(),
          value:    value.to_string(),
          expected: #expected,
        })?
      }
    },
    FieldKind::Optional(inner) => parse_value(key, inner),
    FieldKind::Collection | FieldKind::Other => {
      quote! {
        value.parse().map_err(|_| ConfigError::InvalidValue {
          key:      #key.to_string(),
          value:    value.to_string(),
          expected: "a supported value",
        })?
      }
    },
  }
}

fn merge_step(
  ident: &Ident,
  kind: &FieldKind,
  nested: bool,
) -> proc_macro2::TokenStream {
  match kind {
    _ if nested => {
      quote! {
        if other.#ident.is_some() {
          self.#ident = other.#ident;
        }
      }
    },
    FieldKind::Optional(_) => {
      quote! {
        if other.#ident.is_some() {
          self.#ident = other.#ident;
        }
      }
    },
    FieldKind::Collection => quote! { self.#ident.extend(other.#ident); },
    _ => quote! { self.#ident = other.#ident; },
  }
}
