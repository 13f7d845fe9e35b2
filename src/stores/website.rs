//! Storefront builder document.
//!
//! The document is `{ formData, selectedSections }`. List fields are edited by
//! array index; images are embedded as base64 data URLs so the whole document
//! stays a single self-contained JSON string.

use std::{collections::HashSet, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NavLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderSection {
    pub store_name: String,
    pub logo: Option<String>,
    pub nav_links: Vec<NavLink>,
    pub cta_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSection {
    pub title: String,
    pub subtitle: String,
    pub background_image: Option<String>,
    pub cta_text: String,
    pub cta_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceCard {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicesSection {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<ServiceCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamCard {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo: Option<String>,
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamSection {
    pub title: String,
    pub subtitle: String,
    pub members: Vec<TeamCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Step {
    pub title: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HowItWorksSection {
    pub title: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistic {
    pub label: String,
    pub value: String,
    pub suffix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StatisticsSection {
    pub title: String,
    pub items: Vec<Statistic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonial {
    pub author: String,
    pub role: String,
    pub quote: String,
    pub rating: u8,
    pub photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialsSection {
    pub title: String,
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Tel,
    Number,
    Date,
    Textarea,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    fn needs_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
    Third,
}

impl FieldWidth {
    /// Width in a 12-column grid.
    pub fn span(&self) -> u8 {
        match self {
            FieldWidth::Full => 12,
            FieldWidth::Half => 6,
            FieldWidth::Third => 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub width: FieldWidth,
    pub options: Vec<String>,
}

/// Body of the contact-field builder; the id is assigned by the document.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FormFieldInput {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub width: FieldWidth,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactSection {
    pub title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub map_url: String,
    pub form_fields: Vec<FormField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPost {
    pub title: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub author: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogSection {
    pub title: String,
    pub posts: Vec<BlogPost>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterSection {
    pub about: String,
    pub copyright: String,
    pub links: Vec<NavLink>,
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteForm {
    pub header: HeaderSection,
    pub hero: HeroSection,
    pub services: ServicesSection,
    pub team: TeamSection,
    pub how_it_works: HowItWorksSection,
    pub statistics: StatisticsSection,
    pub testimonials: TestimonialsSection,
    pub contact: ContactSection,
    pub blog: BlogSection,
    pub footer: FooterSection,
}

impl Default for WebsiteForm {
    fn default() -> Self {
        Self {
            header: HeaderSection {
                store_name: "Arreglio".into(),
                logo: None,
                nav_links: vec![
                    NavLink {
                        label: "Services".into(),
                        url: "#services".into(),
                    },
                    NavLink {
                        label: "Contact".into(),
                        url: "#contact".into(),
                    },
                ],
                cta_text: "Book a repair".into(),
            },
            hero: HeroSection {
                title: "Your device, fixed fast".into(),
                subtitle: "Certified technicians and transparent quotes".into(),
                background_image: None,
                cta_text: "Get a quote".into(),
                cta_link: "#contact".into(),
            },
            services: ServicesSection {
                title: "Services".into(),
                ..Default::default()
            },
            team: TeamSection {
                title: "Our team".into(),
                ..Default::default()
            },
            how_it_works: HowItWorksSection {
                title: "How it works".into(),
                steps: vec![
                    Step {
                        title: "Drop off".into(),
                        description: "Bring your device to the shop".into(),
                        icon: "package".into(),
                    },
                    Step {
                        title: "Repair".into(),
                        description: "We diagnose and fix it".into(),
                        icon: "wrench".into(),
                    },
                    Step {
                        title: "Pick up".into(),
                        description: "Collect it as good as new".into(),
                        icon: "check".into(),
                    },
                ],
            },
            statistics: StatisticsSection {
                title: "In numbers".into(),
                ..Default::default()
            },
            testimonials: TestimonialsSection {
                title: "What customers say".into(),
                ..Default::default()
            },
            contact: ContactSection {
                title: "Contact us".into(),
                form_fields: vec![
                    FormField {
                        id: "name".into(),
                        field_type: FieldType::Text,
                        label: "Name".into(),
                        required: true,
                        width: FieldWidth::Half,
                        ..Default::default()
                    },
                    FormField {
                        id: "email".into(),
                        field_type: FieldType::Email,
                        label: "Email".into(),
                        required: true,
                        width: FieldWidth::Half,
                        ..Default::default()
                    },
                    FormField {
                        id: "message".into(),
                        field_type: FieldType::Textarea,
                        label: "Message".into(),
                        required: false,
                        width: FieldWidth::Full,
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
            blog: BlogSection {
                title: "Blog".into(),
                posts: Vec::new(),
            },
            footer: FooterSection {
                copyright: "© Arreglio".into(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Header,
    Hero,
    Services,
    Team,
    HowItWorks,
    Statistics,
    Testimonials,
    Contact,
    Blog,
    Footer,
}

impl FromStr for SectionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Self::Header),
            "hero" => Ok(Self::Hero),
            "services" => Ok(Self::Services),
            "team" => Ok(Self::Team),
            "how-it-works" | "howItWorks" => Ok(Self::HowItWorks),
            "statistics" => Ok(Self::Statistics),
            "testimonials" => Ok(Self::Testimonials),
            "contact" => Ok(Self::Contact),
            "blog" => Ok(Self::Blog),
            "footer" => Ok(Self::Footer),
            _ => Err(AppError::BadRequest(format!("Unknown section: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectedSections {
    pub header: bool,
    pub hero: bool,
    pub services: bool,
    pub team: bool,
    pub how_it_works: bool,
    pub statistics: bool,
    pub testimonials: bool,
    pub contact: bool,
    pub blog: bool,
    pub footer: bool,
}

impl Default for SelectedSections {
    fn default() -> Self {
        Self {
            header: true,
            hero: true,
            services: true,
            team: true,
            how_it_works: true,
            statistics: true,
            testimonials: true,
            contact: true,
            blog: true,
            footer: true,
        }
    }
}

impl SelectedSections {
    fn slot(&mut self, kind: SectionKind) -> &mut bool {
        match kind {
            SectionKind::Header => &mut self.header,
            SectionKind::Hero => &mut self.hero,
            SectionKind::Services => &mut self.services,
            SectionKind::Team => &mut self.team,
            SectionKind::HowItWorks => &mut self.how_it_works,
            SectionKind::Statistics => &mut self.statistics,
            SectionKind::Testimonials => &mut self.testimonials,
            SectionKind::Contact => &mut self.contact,
            SectionKind::Blog => &mut self.blog,
            SectionKind::Footer => &mut self.footer,
        }
    }

    pub fn set(&mut self, kind: SectionKind, selected: bool) {
        *self.slot(kind) = selected;
    }
}

/// Index-addressable lists of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    NavLinks,
    Services,
    Team,
    Steps,
    Statistics,
    Testimonials,
    BlogPosts,
    FooterLinks,
    FooterSocial,
}

impl FromStr for ListKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nav-links" => Ok(Self::NavLinks),
            "services" => Ok(Self::Services),
            "team" => Ok(Self::Team),
            "steps" => Ok(Self::Steps),
            "statistics" => Ok(Self::Statistics),
            "testimonials" => Ok(Self::Testimonials),
            "blog-posts" => Ok(Self::BlogPosts),
            "footer-links" => Ok(Self::FooterLinks),
            "footer-social" => Ok(Self::FooterSocial),
            _ => Err(AppError::BadRequest(format!("Unknown list: {s}"))),
        }
    }
}

/// Image slots that accept uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Logo,
    HeroBackground,
    TeamPhoto,
    TestimonialPhoto,
    BlogImage,
}

impl FromStr for ImageTarget {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logo" => Ok(Self::Logo),
            "hero" => Ok(Self::HeroBackground),
            "team" => Ok(Self::TeamPhoto),
            "testimonial" => Ok(Self::TestimonialPhoto),
            "blog" => Ok(Self::BlogImage),
            _ => Err(AppError::BadRequest(format!("Unknown image target: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: String,
    pub required: bool,
    pub span: u8,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PreviewRow {
    pub fields: Vec<PreviewField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WebsiteDocument {
    pub form_data: WebsiteForm,
    pub selected_sections: SelectedSections,
}

fn parse<T: DeserializeOwned>(what: &str, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|err| AppError::BadRequest(format!("Invalid {what}: {err}")))
}

fn out_of_range(index: usize, len: usize) -> AppError {
    AppError::BadRequest(format!("Index {index} is out of range (length {len})"))
}

fn push_value<T: DeserializeOwned>(items: &mut Vec<T>, what: &str, value: Value) -> AppResult<usize> {
    items.push(parse(what, value)?);
    Ok(items.len() - 1)
}

fn replace_value<T: DeserializeOwned>(
    items: &mut [T],
    index: usize,
    what: &str,
    value: Value,
) -> AppResult<()> {
    let len = items.len();
    let slot = items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
    *slot = parse(what, value)?;
    Ok(())
}

fn remove_value<T>(items: &mut Vec<T>, index: usize) -> AppResult<()> {
    if index >= items.len() {
        return Err(out_of_range(index, items.len()));
    }
    items.remove(index);
    Ok(())
}

/// Runs `op` against the list named by `kind`, typed by its item.
macro_rules! with_list {
    ($form:expr, $kind:expr, |$items:ident, $what:ident| $body:expr) => {
        match $kind {
            ListKind::NavLinks => {
                let ($items, $what) = (&mut $form.header.nav_links, "nav link");
                $body
            }
            ListKind::Services => {
                let ($items, $what) = (&mut $form.services.items, "service");
                $body
            }
            ListKind::Team => {
                let ($items, $what) = (&mut $form.team.members, "team member");
                $body
            }
            ListKind::Steps => {
                let ($items, $what) = (&mut $form.how_it_works.steps, "step");
                $body
            }
            ListKind::Statistics => {
                let ($items, $what) = (&mut $form.statistics.items, "statistic");
                $body
            }
            ListKind::Testimonials => {
                let ($items, $what) = (&mut $form.testimonials.items, "testimonial");
                $body
            }
            ListKind::BlogPosts => {
                let ($items, $what) = (&mut $form.blog.posts, "blog post");
                $body
            }
            ListKind::FooterLinks => {
                let ($items, $what) = (&mut $form.footer.links, "footer link");
                $body
            }
            ListKind::FooterSocial => {
                let ($items, $what) = (&mut $form.footer.social_links, "social link");
                $body
            }
        }
    };
}

impl WebsiteDocument {
    pub fn replace_section(&mut self, kind: SectionKind, value: Value) -> AppResult<()> {
        let form = &mut self.form_data;
        match kind {
            SectionKind::Header => form.header = parse("header", value)?,
            SectionKind::Hero => form.hero = parse("hero", value)?,
            SectionKind::Services => form.services = parse("services", value)?,
            SectionKind::Team => form.team = parse("team", value)?,
            SectionKind::HowItWorks => form.how_it_works = parse("how it works", value)?,
            SectionKind::Statistics => form.statistics = parse("statistics", value)?,
            SectionKind::Testimonials => form.testimonials = parse("testimonials", value)?,
            SectionKind::Contact => {
                let mut contact: ContactSection = parse("contact", value)?;
                let mut v = Validator::new();
                for (index, field) in contact.form_fields.iter().enumerate() {
                    check_field(
                        &mut v,
                        &format!("formFields[{index}]."),
                        &field.field_type,
                        &field.label,
                        &field.options,
                    );
                }
                v.finish()?;

                let mut seen = HashSet::new();
                for field in contact.form_fields.iter_mut() {
                    if field.id.is_empty() || !seen.insert(field.id.clone()) {
                        field.id = Uuid::new_v4().to_string();
                        seen.insert(field.id.clone());
                    }
                    field.label = field.label.trim().to_string();
                    field.options = trimmed_options(std::mem::take(&mut field.options));
                }
                form.contact = contact;
            }
            SectionKind::Blog => form.blog = parse("blog", value)?,
            SectionKind::Footer => form.footer = parse("footer", value)?,
        }
        Ok(())
    }

    pub fn add_item(&mut self, list: ListKind, value: Value) -> AppResult<usize> {
        with_list!(self.form_data, list, |items, what| push_value(items, what, value))
    }

    pub fn update_item(&mut self, list: ListKind, index: usize, value: Value) -> AppResult<()> {
        with_list!(self.form_data, list, |items, what| replace_value(
            items, index, what, value
        ))
    }

    pub fn remove_item(&mut self, list: ListKind, index: usize) -> AppResult<()> {
        with_list!(self.form_data, list, |items, _what| remove_value(items, index))
    }

    pub fn add_member_social(&mut self, member: usize, link: SocialLink) -> AppResult<usize> {
        let members = &mut self.form_data.team.members;
        let len = members.len();
        let card = members.get_mut(member).ok_or_else(|| out_of_range(member, len))?;
        card.social_links.push(link);
        Ok(card.social_links.len() - 1)
    }

    pub fn remove_member_social(&mut self, member: usize, link: usize) -> AppResult<()> {
        let members = &mut self.form_data.team.members;
        let len = members.len();
        let card = members.get_mut(member).ok_or_else(|| out_of_range(member, len))?;
        remove_value(&mut card.social_links, link)
    }

    pub fn add_field(&mut self, input: FormFieldInput) -> AppResult<FormField> {
        validate_field(&input)?;
        let field = field_from_input(Uuid::new_v4().to_string(), input);
        self.form_data.contact.form_fields.push(field.clone());
        Ok(field)
    }

    pub fn update_field(&mut self, id: &str, input: FormFieldInput) -> AppResult<FormField> {
        validate_field(&input)?;
        let slot = self
            .form_data
            .contact
            .form_fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(AppError::NotFound)?;
        *slot = field_from_input(id.to_string(), input);
        Ok(slot.clone())
    }

    pub fn remove_field(&mut self, id: &str) -> AppResult<FormField> {
        let fields = &mut self.form_data.contact.form_fields;
        let index = fields
            .iter()
            .position(|f| f.id == id)
            .ok_or(AppError::NotFound)?;
        Ok(fields.remove(index))
    }

    /// Stores a data URL in the targeted image slot. List targets need an index.
    pub fn set_image(
        &mut self,
        target: ImageTarget,
        index: Option<usize>,
        data_url: String,
    ) -> AppResult<()> {
        let form = &mut self.form_data;
        let need_index =
            || index.ok_or_else(|| AppError::BadRequest("index is required for this image".into()));
        match target {
            ImageTarget::Logo => form.header.logo = Some(data_url),
            ImageTarget::HeroBackground => form.hero.background_image = Some(data_url),
            ImageTarget::TeamPhoto => {
                let i = need_index()?;
                let len = form.team.members.len();
                form.team
                    .members
                    .get_mut(i)
                    .ok_or_else(|| out_of_range(i, len))?
                    .photo = Some(data_url);
            }
            ImageTarget::TestimonialPhoto => {
                let i = need_index()?;
                let len = form.testimonials.items.len();
                form.testimonials
                    .items
                    .get_mut(i)
                    .ok_or_else(|| out_of_range(i, len))?
                    .photo = Some(data_url);
            }
            ImageTarget::BlogImage => {
                let i = need_index()?;
                let len = form.blog.posts.len();
                form.blog
                    .posts
                    .get_mut(i)
                    .ok_or_else(|| out_of_range(i, len))?
                    .image = Some(data_url);
            }
        }
        Ok(())
    }

    pub fn contact_preview(&self) -> Vec<PreviewRow> {
        render_preview(&self.form_data.contact.form_fields)
    }
}

fn check_field(
    v: &mut Validator,
    prefix: &str,
    field_type: &FieldType,
    label: &str,
    options: &[String],
) {
    v.require(&format!("{prefix}label"), label, "Field label is required");
    if field_type.needs_options() && options.iter().all(|o| o.trim().is_empty()) {
        v.add(&format!("{prefix}options"), "Add at least one option");
    }
}

fn validate_field(input: &FormFieldInput) -> AppResult<()> {
    let mut v = Validator::new();
    check_field(&mut v, "", &input.field_type, &input.label, &input.options);
    v.finish()
}

fn trimmed_options(options: Vec<String>) -> Vec<String> {
    options
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

fn field_from_input(id: String, input: FormFieldInput) -> FormField {
    FormField {
        id,
        field_type: input.field_type,
        label: input.label.trim().to_string(),
        placeholder: input.placeholder,
        required: input.required,
        width: input.width,
        options: trimmed_options(input.options),
    }
}

/// Packs fields into 12-column rows, in order. A field that does not fit starts a new row.
pub fn render_preview(fields: &[FormField]) -> Vec<PreviewRow> {
    let mut rows = Vec::new();
    let mut current: Vec<PreviewField> = Vec::new();
    let mut used = 0u8;
    for field in fields {
        let span = field.width.span();
        if used + span > 12 && !current.is_empty() {
            rows.push(PreviewRow {
                fields: std::mem::take(&mut current),
            });
            used = 0;
        }
        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.clone()
        };
        current.push(PreviewField {
            id: field.id.clone(),
            field_type: field.field_type,
            label,
            placeholder: field.placeholder.clone(),
            required: field.required,
            span,
            options: field.options.clone(),
        });
        used += span;
    }
    if !current.is_empty() {
        rows.push(PreviewRow { fields: current });
    }
    rows
}

/// Encodes an uploaded image as `data:<mime>;base64,<payload>`.
pub fn to_data_url(content_type: &str, bytes: &[u8]) -> AppResult<String> {
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest(format!(
            "Only images can be embedded, got {content_type}"
        )));
    }
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Image is empty".into()));
    }
    Ok(format!("data:{content_type};base64,{}", STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(label: &str, width: FieldWidth) -> FormField {
        FormField {
            id: label.to_lowercase(),
            label: label.into(),
            width,
            ..Default::default()
        }
    }

    #[test]
    fn preview_packs_fields_into_rows() {
        let fields = vec![
            field("First", FieldWidth::Half),
            field("Last", FieldWidth::Half),
            field("City", FieldWidth::Third),
            field("Zip", FieldWidth::Third),
            field("Phone", FieldWidth::Half),
            field("Message", FieldWidth::Full),
        ];
        let rows = render_preview(&fields);
        let shape: Vec<Vec<u8>> = rows
            .iter()
            .map(|r| r.fields.iter().map(|f| f.span).collect())
            .collect();
        assert_eq!(shape, vec![vec![6, 6], vec![4, 4], vec![6], vec![12]]);
    }

    #[test]
    fn required_fields_are_marked_in_preview() {
        let mut doc = WebsiteDocument::default();
        let rows = doc.contact_preview();
        assert_eq!(rows[0].fields[0].label, "Name *");

        doc.add_field(FormFieldInput {
            field_type: FieldType::Select,
            label: "Device".into(),
            options: vec!["Phone".into(), " ".into(), "Laptop".into()],
            width: FieldWidth::Third,
            ..Default::default()
        })
        .unwrap();
        let rows = doc.contact_preview();
        let last = rows.last().unwrap();
        assert_eq!(last.fields[0].label, "Device");
        assert_eq!(last.fields[0].options, vec!["Phone", "Laptop"]);
    }

    #[test]
    fn select_without_options_is_rejected() {
        let mut doc = WebsiteDocument::default();
        let before = doc.form_data.contact.form_fields.len();
        let err = doc
            .add_field(FormFieldInput {
                field_type: FieldType::Radio,
                label: "Pick one".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(fields) if fields.contains_key("options")));
        assert_eq!(doc.form_data.contact.form_fields.len(), before);
    }

    #[test]
    fn list_items_are_edited_by_index() {
        let mut doc = WebsiteDocument::default();
        let i = doc
            .add_item(ListKind::Services, json!({ "title": "Screens", "price": "from 49€" }))
            .unwrap();
        assert_eq!(i, 0);
        doc.add_item(ListKind::Services, json!({ "title": "Batteries" }))
            .unwrap();
        doc.update_item(ListKind::Services, 1, json!({ "title": "Batteries", "icon": "battery" }))
            .unwrap();
        doc.remove_item(ListKind::Services, 0).unwrap();

        let items = &doc.form_data.services.items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].icon, "battery");

        assert!(matches!(
            doc.remove_item(ListKind::Services, 5),
            Err(AppError::BadRequest(_))
        ));
        assert!(doc
            .add_item(ListKind::Statistics, json!({ "label": 12 }))
            .is_err());
    }

    #[test]
    fn team_social_links_nest_under_members() {
        let mut doc = WebsiteDocument::default();
        doc.add_item(ListKind::Team, json!({ "name": "Carlos", "role": "Technician" }))
            .unwrap();
        let link = SocialLink {
            platform: "instagram".into(),
            url: "https://instagram.com/carlos".into(),
        };
        assert_eq!(doc.add_member_social(0, link.clone()).unwrap(), 0);
        assert!(doc.add_member_social(3, link).is_err());
        doc.remove_member_social(0, 0).unwrap();
        assert!(doc.form_data.team.members[0].social_links.is_empty());
    }

    #[test]
    fn images_become_data_urls() {
        let url = to_data_url("image/png", &[0x89, 0x50, 0x4e, 0x47]).unwrap();
        assert_eq!(url, "data:image/png;base64,iVBORw==");
        assert!(to_data_url("text/plain", b"hi").is_err());

        let mut doc = WebsiteDocument::default();
        doc.set_image(ImageTarget::Logo, None, url.clone()).unwrap();
        assert_eq!(doc.form_data.header.logo.as_deref(), Some(url.as_str()));
        assert!(doc.set_image(ImageTarget::BlogImage, None, url.clone()).is_err());
        assert!(doc.set_image(ImageTarget::BlogImage, Some(0), url).is_err());
    }

    #[test]
    fn document_serializes_with_form_data_and_selection() {
        let mut doc = WebsiteDocument::default();
        doc.selected_sections.set(SectionKind::Blog, false);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["formData"]["header"]["storeName"], "Arreglio");
        assert_eq!(json["selectedSections"]["blog"], false);
        assert_eq!(json["selectedSections"]["howItWorks"], true);
        let back: WebsiteDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn replacing_contact_assigns_missing_field_ids() {
        let mut doc = WebsiteDocument::default();
        doc.replace_section(
            SectionKind::Contact,
            json!({ "title": "Write us", "formFields": [{ "type": "email", "label": "Email" }] }),
        )
        .unwrap();
        let fields = &doc.form_data.contact.form_fields;
        assert_eq!(fields.len(), 1);
        assert!(!fields[0].id.is_empty());
        assert_eq!(fields[0].field_type, FieldType::Email);
    }

    #[test]
    fn replacing_contact_checks_every_field() {
        let mut doc = WebsiteDocument::default();
        let before = doc.clone();
        let err = doc
            .replace_section(
                SectionKind::Contact,
                json!({ "formFields": [
                    { "type": "text", "label": "Name" },
                    { "type": "select", "label": "Device", "options": [" "] },
                    { "type": "text", "label": "  " }
                ] }),
            )
            .unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("formFields[1].options"));
        assert!(fields.contains_key("formFields[2].label"));
        assert!(!fields.contains_key("formFields[0].label"));
        assert_eq!(doc, before);
    }

    #[test]
    fn replacing_contact_renumbers_duplicate_field_ids() {
        let mut doc = WebsiteDocument::default();
        doc.replace_section(
            SectionKind::Contact,
            json!({ "formFields": [
                { "id": "device", "type": "radio", "label": " Device ", "options": ["Phone", ""] },
                { "id": "device", "type": "text", "label": "Model" }
            ] }),
        )
        .unwrap();
        let fields = &doc.form_data.contact.form_fields;
        assert_eq!(fields[0].id, "device");
        assert_ne!(fields[1].id, "device");
        assert_eq!(fields[0].label, "Device");
        assert_eq!(fields[0].options, vec!["Phone"]);
    }
}
