//! HTML parser for school profile pages
//!
//! A profile page carries its data in Bootstrap panels:
//!
//! - `#profil .panel-info` panels, told apart by heading text
//!   ("Identitas", "Pelengkap", "Rinci")
//! - a `.profile-usermenu` sidebar of `Label: value` list items
//! - one `#kontak .panel-info` panel with the address block
//!
//! Panel rows are `<p><strong>Label :</strong> value</p>`.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Label → raw value for one panel
pub type Section = HashMap<String, String>;

/// All label/value groups read from one profile page
///
/// Sections the page does not have are empty, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSections {
    /// "Identitas Sekolah"
    pub identity: Section,

    /// "Data Pelengkap"
    pub supplementary: Section,

    /// "Data Rinci"
    pub detailed: Section,

    /// Sidebar (`Kepsek`, `Operator`, `Akreditasi`, ...)
    pub sidebar: Section,

    /// "Kontak" panel
    pub contact: Section,
}

impl ProfileSections {
    pub fn is_empty(&self) -> bool {
        self.identity.is_empty()
            && self.supplementary.is_empty()
            && self.detailed.is_empty()
            && self.sidebar.is_empty()
            && self.contact.is_empty()
    }
}

/// Parses a profile page into its sections
///
/// Returns `Err` when the page has no `#profil` container at all, which is
/// what challenge and error pages look like.
///
/// # Example
///
/// ```
/// use dapo_harvest::extract::parse_profile;
///
/// let html = r#"<div id="profil"><div class="panel-info">
///     <div class="panel-heading">Identitas Sekolah</div>
///     <div class="panel-body"><p><strong>NPSN :</strong> 20219184</p></div>
/// </div></div>"#;
/// let profile = parse_profile(html).unwrap();
/// assert_eq!(profile.identity["NPSN"], "20219184");
/// ```
pub fn parse_profile(html: &str) -> Result<ProfileSections, String> {
    let document = Html::parse_document(html);

    let profile_root = selector("#profil")?;
    if document.select(&profile_root).next().is_none() {
        return Err("page has no #profil container".to_string());
    }

    let mut sections = ProfileSections::default();
    parse_profile_panels(&document, &mut sections)?;
    sections.sidebar = parse_sidebar(&document)?;
    sections.contact = parse_contact(&document)?;

    Ok(sections)
}

/// Routes each `#profil` panel to a section by its heading
fn parse_profile_panels(document: &Html, sections: &mut ProfileSections) -> Result<(), String> {
    let panel_selector = selector("#profil .panel-info")?;
    let heading_selector = selector(".panel-heading")?;
    let row_selector = selector(".panel-body p")?;
    let label_selector = selector("strong")?;

    for panel in document.select(&panel_selector) {
        let Some(heading) = panel.select(&heading_selector).next() else {
            continue;
        };
        let heading = stripped_text(heading);

        let section: Section = panel
            .select(&row_selector)
            .filter_map(|row| labeled_value(row, &label_selector))
            .collect();

        if heading.contains("Identitas") {
            sections.identity = section;
        } else if heading.contains("Pelengkap") {
            sections.supplementary = section;
        } else if heading.contains("Rinci") {
            sections.detailed = section;
        }
    }

    Ok(())
}

/// `Label: value` list items in the sidebar
fn parse_sidebar(document: &Html) -> Result<Section, String> {
    let menu_selector = selector(".profile-usermenu")?;
    let item_selector = selector("li")?;

    let Some(menu) = document.select(&menu_selector).next() else {
        return Ok(Section::new());
    };

    Ok(menu
        .select(&item_selector)
        .filter_map(|item| {
            let text = stripped_text(item);
            let (label, value) = text.split_once(':')?;
            Some((label.trim().to_string(), value.trim().to_string()))
        })
        .collect())
}

/// Label/value rows of the first `#kontak` panel
fn parse_contact(document: &Html) -> Result<Section, String> {
    let panel_selector = selector("#kontak .panel-info")?;
    let row_selector = selector("p")?;
    let label_selector = selector("strong")?;

    let Some(panel) = document.select(&panel_selector).next() else {
        return Ok(Section::new());
    };

    Ok(panel
        .select(&row_selector)
        .filter_map(|row| labeled_value(row, &label_selector))
        .collect())
}

/// Reads `<strong>Label :</strong> value` from one row
///
/// The value is the first non-blank node after the label. Rows without a
/// label are skipped.
fn labeled_value(row: ElementRef<'_>, label_selector: &Selector) -> Option<(String, String)> {
    let label = row.select(label_selector).next()?;
    let key = stripped_text(label).replace(':', "").trim().to_string();

    let value = label
        .next_siblings()
        .map(|node| {
            if let Some(text) = node.value().as_text() {
                text.trim().to_string()
            } else if let Some(element) = ElementRef::wrap(node) {
                stripped_text(element)
            } else {
                String::new()
            }
        })
        .find(|text| !text.is_empty())
        .unwrap_or_default();

    Some((key, clean_value(&value)))
}

/// Text of an element with every text node trimmed and joined
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Drops a leading separator colon left over from `Label : value`
fn clean_value(value: &str) -> String {
    value.trim().trim_start_matches(':').trim().to_string()
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}
