//! Editing buffer for the profile content.
//!
//! A [`WorkingCopy`] owns an independent clone of the snapshot it was opened
//! from. Every operation mutates only that clone; nothing reaches the
//! canonical snapshot until the caller commits the result through the
//! profile store.

use std::fmt;

use crate::id::RecordId;
use crate::model::{
    Category, CertificationEntry, EducationEntry, ExperienceEntry,
    ImageSource, InlineImage, MetricEntry, PortfolioEntry, ProfileSnapshot,
};
use crate::Result;

pub const REMOVE_PROMPT: &str = "정말 이 항목을 삭제하시겠습니까?";
pub const CLEAR_PROMPT: &str = "해당 섹션의 모든 내용을 삭제하시겠습니까?";

const NEW_METRIC_LABEL: &str = "항목";
const NEW_METRIC_VALUE: &str = "값";

/// Interactive guard asked before any destructive operation.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a single editing operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// The working copy changed.
    Applied,
    /// The target exists but already held the requested state.
    Unchanged,
    /// The user declined the confirmation prompt.
    Declined,
    /// No record with the given id or position.
    NotFound,
}

/// Every list in the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Expertise,
    Experience,
    Education,
    Certifications,
    Portfolio,
    CertificationImages,
}

impl Section {
    /// Key of the list in the persisted JSON.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Expertise => "expertise",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Certifications => "certifications",
            Section::Portfolio => "portfolioItems",
            Section::CertificationImages => "certificationImages",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The identifier-keyed lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordSection {
    Experience,
    Education,
    Certifications,
    Portfolio,
}

impl RecordSection {
    pub const ALL: [RecordSection; 4] = [
        RecordSection::Experience,
        RecordSection::Education,
        RecordSection::Certifications,
        RecordSection::Portfolio,
    ];

    /// Tag embedded in generated ids.
    pub fn tag(&self) -> &'static str {
        Section::from(*self).key()
    }
}

impl From<RecordSection> for Section {
    fn from(section: RecordSection) -> Self {
        match section {
            RecordSection::Experience => Section::Experience,
            RecordSection::Education => Section::Education,
            RecordSection::Certifications => Section::Certifications,
            RecordSection::Portfolio => Section::Portfolio,
        }
    }
}

/// A record kind living in an identifier-keyed list.
pub trait Record: Clone {
    type Field;

    const SECTION: RecordSection;

    fn id(&self) -> &RecordId;

    /// A record with placeholder values for a freshly added entry.
    fn template(id: RecordId) -> Self;

    /// Assign one field. Returns whether the record changed.
    fn apply(&mut self, field: Self::Field) -> bool;

    fn list(snapshot: &ProfileSnapshot) -> &Vec<Self>;

    fn list_mut(snapshot: &mut ProfileSnapshot) -> &mut Vec<Self>;
}

fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExperienceField {
    Period(String),
    Title(String),
    Description(String),
}

impl Record for ExperienceEntry {
    type Field = ExperienceField;

    const SECTION: RecordSection = RecordSection::Experience;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn template(id: RecordId) -> Self {
        Self {
            id,
            period: "2024-현재".to_owned(),
            title: "새로운 경력".to_owned(),
            description: "업무 내용을 입력하세요.".to_owned(),
        }
    }

    fn apply(&mut self, field: ExperienceField) -> bool {
        match field {
            ExperienceField::Period(v) => assign(&mut self.period, v),
            ExperienceField::Title(v) => assign(&mut self.title, v),
            ExperienceField::Description(v) => assign(&mut self.description, v),
        }
    }

    fn list(snapshot: &ProfileSnapshot) -> &Vec<Self> {
        &snapshot.experience
    }

    fn list_mut(snapshot: &mut ProfileSnapshot) -> &mut Vec<Self> {
        &mut snapshot.experience
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EducationField {
    Period(String),
    Degree(String),
    Institution(String),
}

impl Record for EducationEntry {
    type Field = EducationField;

    const SECTION: RecordSection = RecordSection::Education;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn template(id: RecordId) -> Self {
        Self {
            id,
            period: "2024".to_owned(),
            degree: "학위 명칭".to_owned(),
            institution: "교육 기관".to_owned(),
        }
    }

    fn apply(&mut self, field: EducationField) -> bool {
        match field {
            EducationField::Period(v) => assign(&mut self.period, v),
            EducationField::Degree(v) => assign(&mut self.degree, v),
            EducationField::Institution(v) => assign(&mut self.institution, v),
        }
    }

    fn list(snapshot: &ProfileSnapshot) -> &Vec<Self> {
        &snapshot.education
    }

    fn list_mut(snapshot: &mut ProfileSnapshot) -> &mut Vec<Self> {
        &mut snapshot.education
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CertificationField {
    Date(String),
    Title(String),
    Organization(String),
}

impl Record for CertificationEntry {
    type Field = CertificationField;

    const SECTION: RecordSection = RecordSection::Certifications;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn template(id: RecordId) -> Self {
        Self {
            id,
            date: "2024.01".to_owned(),
            title: "자격 명칭".to_owned(),
            organization: "발행 기관".to_owned(),
        }
    }

    fn apply(&mut self, field: CertificationField) -> bool {
        match field {
            CertificationField::Date(v) => assign(&mut self.date, v),
            CertificationField::Title(v) => assign(&mut self.title, v),
            CertificationField::Organization(v) => {
                assign(&mut self.organization, v)
            }
        }
    }

    fn list(snapshot: &ProfileSnapshot) -> &Vec<Self> {
        &snapshot.certifications
    }

    fn list_mut(snapshot: &mut ProfileSnapshot) -> &mut Vec<Self> {
        &mut snapshot.certifications
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortfolioField {
    Category(Category),
    Title(String),
    Description(String),
    Date(String),
}

impl Record for PortfolioEntry {
    type Field = PortfolioField;

    const SECTION: RecordSection = RecordSection::Portfolio;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn template(id: RecordId) -> Self {
        Self {
            id,
            category: Category::Academic,
            title: "활동 제목".to_owned(),
            description: "활동 상세 설명".to_owned(),
            images: Vec::new(),
            date: "2024".to_owned(),
        }
    }

    fn apply(&mut self, field: PortfolioField) -> bool {
        match field {
            PortfolioField::Category(v) => assign(&mut self.category, v),
            PortfolioField::Title(v) => assign(&mut self.title, v),
            PortfolioField::Description(v) => assign(&mut self.description, v),
            PortfolioField::Date(v) => assign(&mut self.date, v),
        }
    }

    fn list(snapshot: &ProfileSnapshot) -> &Vec<Self> {
        &snapshot.portfolio
    }

    fn list_mut(snapshot: &mut ProfileSnapshot) -> &mut Vec<Self> {
        &mut snapshot.portfolio
    }
}

/// A single field assignment on an identifier-keyed record. The variant
/// selects the section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate {
    Experience(ExperienceField),
    Education(EducationField),
    Certification(CertificationField),
    Portfolio(PortfolioField),
}

impl FieldUpdate {
    pub fn section(&self) -> RecordSection {
        match self {
            FieldUpdate::Experience(_) => RecordSection::Experience,
            FieldUpdate::Education(_) => RecordSection::Education,
            FieldUpdate::Certification(_) => RecordSection::Certifications,
            FieldUpdate::Portfolio(_) => RecordSection::Portfolio,
        }
    }
}

/// Top-level text fields of the profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileField {
    Name(String),
    Email(String),
    Phone(String),
    Headline(String),
    SubHeadline(String),
    Philosophy(String),
    PhilosophyHighlight(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MetricField {
    Label(String),
    Value(String),
}

/// Where a batch of ingested images lands.
///
/// A portfolio target holds the id captured when the upload started, so
/// images still reach the right entry if the list is reordered or shrinks
/// before ingestion completes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageTarget {
    Profile,
    CertificationGallery,
    Portfolio(RecordId),
}

/// Size of the working copy relative to the export ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayloadReport {
    pub size: usize,
    pub ceiling: usize,
}

impl PayloadReport {
    pub fn exceeds_ceiling(&self) -> bool {
        self.size > self.ceiling
    }
}

fn position<R: Record>(records: &[R], id: &RecordId) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

fn update_record<R: Record>(
    records: &mut [R],
    id: &RecordId,
    field: R::Field,
) -> EditOutcome {
    let Some(idx) = position(records, id) else {
        return EditOutcome::NotFound;
    };
    if records[idx].apply(field) {
        EditOutcome::Applied
    } else {
        EditOutcome::Unchanged
    }
}

/// Isolated, mutable clone of a profile snapshot.
#[derive(Clone, Debug)]
pub struct WorkingCopy {
    origin: ProfileSnapshot,
    draft: ProfileSnapshot,
    revision: u64,
}

impl WorkingCopy {
    /// Open a working copy on a deep copy of `snapshot`.
    pub fn open(snapshot: &ProfileSnapshot) -> Self {
        Self {
            origin: snapshot.clone(),
            draft: snapshot.clone(),
            revision: 0,
        }
    }

    pub fn snapshot(&self) -> &ProfileSnapshot {
        &self.draft
    }

    pub fn into_snapshot(self) -> ProfileSnapshot {
        self.draft
    }

    /// Counter bumped by every operation that changed the working copy.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the working copy differs from the snapshot it was opened on.
    pub fn is_dirty(&self) -> bool {
        self.draft != self.origin
    }

    fn record(&mut self, outcome: EditOutcome) -> EditOutcome {
        if outcome == EditOutcome::Applied {
            self.revision += 1;
        }
        outcome
    }

    pub fn set_profile_field(&mut self, field: ProfileField) -> EditOutcome {
        let draft = &mut self.draft;
        let changed = match field {
            ProfileField::Name(v) => assign(&mut draft.name, v),
            ProfileField::Email(v) => assign(&mut draft.email, v),
            ProfileField::Phone(v) => assign(&mut draft.phone, v),
            ProfileField::Headline(v) => assign(&mut draft.headline, v),
            ProfileField::SubHeadline(v) => assign(&mut draft.sub_headline, v),
            ProfileField::Philosophy(v) => assign(&mut draft.philosophy, v),
            ProfileField::PhilosophyHighlight(v) => {
                assign(&mut draft.philosophy_highlight, v)
            }
        };
        let outcome = if changed {
            EditOutcome::Applied
        } else {
            EditOutcome::Unchanged
        };
        self.record(outcome)
    }

    /// Prepend a record with template values and a fresh id.
    pub fn add<R: Record>(&mut self) -> RecordId {
        let records = R::list_mut(&mut self.draft);
        let id = RecordId::generate_unique(
            R::SECTION.tag(),
            records.iter().map(Record::id),
        );
        records.insert(0, R::template(id.clone()));
        log::trace!("added {} to {}", id, R::SECTION.tag());
        self.record(EditOutcome::Applied);
        id
    }

    /// Section-dispatched form of [`WorkingCopy::add`].
    pub fn add_record(&mut self, section: RecordSection) -> RecordId {
        match section {
            RecordSection::Experience => self.add::<ExperienceEntry>(),
            RecordSection::Education => self.add::<EducationEntry>(),
            RecordSection::Certifications => self.add::<CertificationEntry>(),
            RecordSection::Portfolio => self.add::<PortfolioEntry>(),
        }
    }

    pub fn get<R: Record>(&self, id: &RecordId) -> Option<&R> {
        R::list(&self.draft)
            .iter()
            .find(|record| record.id() == id)
    }

    /// Assign one field of the record with the given id, leaving every
    /// other field and the record's position untouched.
    pub fn update_field(
        &mut self,
        id: &RecordId,
        update: FieldUpdate,
    ) -> EditOutcome {
        let draft = &mut self.draft;
        let section = update.section();
        let outcome = match update {
            FieldUpdate::Experience(f) => {
                update_record(&mut draft.experience, id, f)
            }
            FieldUpdate::Education(f) => {
                update_record(&mut draft.education, id, f)
            }
            FieldUpdate::Certification(f) => {
                update_record(&mut draft.certifications, id, f)
            }
            FieldUpdate::Portfolio(f) => {
                update_record(&mut draft.portfolio, id, f)
            }
        };
        if outcome == EditOutcome::NotFound {
            log::debug!("update ignored, no {} in {}", id, section.tag());
        }
        self.record(outcome)
    }

    fn remove<R: Record>(
        &mut self,
        id: &RecordId,
        confirm: &mut impl Confirm,
    ) -> EditOutcome {
        let Some(idx) = position(R::list(&self.draft), id) else {
            log::debug!("remove ignored, no {} in {}", id, R::SECTION.tag());
            return EditOutcome::NotFound;
        };
        if !confirm.confirm(REMOVE_PROMPT) {
            return EditOutcome::Declined;
        }
        R::list_mut(&mut self.draft).remove(idx);
        log::trace!("removed {} from {}", id, R::SECTION.tag());
        self.record(EditOutcome::Applied)
    }

    /// Remove the record with the given id after confirmation. The order
    /// of the remaining records is preserved.
    pub fn remove_by_id(
        &mut self,
        section: RecordSection,
        id: &RecordId,
        confirm: &mut impl Confirm,
    ) -> EditOutcome {
        match section {
            RecordSection::Experience => {
                self.remove::<ExperienceEntry>(id, confirm)
            }
            RecordSection::Education => {
                self.remove::<EducationEntry>(id, confirm)
            }
            RecordSection::Certifications => {
                self.remove::<CertificationEntry>(id, confirm)
            }
            RecordSection::Portfolio => {
                self.remove::<PortfolioEntry>(id, confirm)
            }
        }
    }

    /// Replace a whole list with an empty one after confirmation.
    pub fn clear_section(
        &mut self,
        section: Section,
        confirm: &mut impl Confirm,
    ) -> EditOutcome {
        if !confirm.confirm(CLEAR_PROMPT) {
            return EditOutcome::Declined;
        }
        let draft = &mut self.draft;
        let was_empty = match section {
            Section::Expertise => {
                std::mem::take(&mut draft.expertise).is_empty()
            }
            Section::Experience => {
                std::mem::take(&mut draft.experience).is_empty()
            }
            Section::Education => {
                std::mem::take(&mut draft.education).is_empty()
            }
            Section::Certifications => {
                std::mem::take(&mut draft.certifications).is_empty()
            }
            Section::Portfolio => {
                std::mem::take(&mut draft.portfolio).is_empty()
            }
            Section::CertificationImages => {
                std::mem::take(&mut draft.certification_images).is_empty()
            }
        };
        log::trace!("cleared {}", section);
        if was_empty {
            EditOutcome::Unchanged
        } else {
            self.record(EditOutcome::Applied)
        }
    }

    /// Append a placeholder metric and return its position.
    pub fn add_metric(&mut self) -> usize {
        self.draft
            .expertise
            .push(MetricEntry::new(NEW_METRIC_LABEL, NEW_METRIC_VALUE));
        self.record(EditOutcome::Applied);
        self.draft.expertise.len() - 1
    }

    pub fn update_metric(
        &mut self,
        index: usize,
        field: MetricField,
    ) -> EditOutcome {
        let Some(metric) = self.draft.expertise.get_mut(index) else {
            log::debug!("metric update ignored, no position {}", index);
            return EditOutcome::NotFound;
        };
        let changed = match field {
            MetricField::Label(v) => assign(&mut metric.label, v),
            MetricField::Value(v) => assign(&mut metric.value, v),
        };
        let outcome = if changed {
            EditOutcome::Applied
        } else {
            EditOutcome::Unchanged
        };
        self.record(outcome)
    }

    /// Remove the metric at `index`; later metrics shift down by one.
    pub fn remove_metric(
        &mut self,
        index: usize,
        confirm: &mut impl Confirm,
    ) -> EditOutcome {
        let outcome =
            remove_position(&mut self.draft.expertise, index, confirm);
        self.record(outcome)
    }

    pub fn remove_certification_image(
        &mut self,
        index: usize,
        confirm: &mut impl Confirm,
    ) -> EditOutcome {
        let outcome = remove_position(
            &mut self.draft.certification_images,
            index,
            confirm,
        );
        self.record(outcome)
    }

    /// Remove image `index` of the portfolio entry `item`.
    pub fn remove_portfolio_image(
        &mut self,
        item: &RecordId,
        index: usize,
        confirm: &mut impl Confirm,
    ) -> EditOutcome {
        let Some(idx) = position(&self.draft.portfolio, item) else {
            log::debug!("image removal ignored, no portfolio item {}", item);
            return EditOutcome::NotFound;
        };
        let outcome = remove_position(
            &mut self.draft.portfolio[idx].images,
            index,
            confirm,
        );
        self.record(outcome)
    }

    /// Assign ingested images to their slot.
    ///
    /// The profile slot takes the first image and replaces the previous
    /// one; the gallery and portfolio targets append in batch order.
    pub fn apply_images(
        &mut self,
        target: &ImageTarget,
        images: Vec<InlineImage>,
    ) -> EditOutcome {
        if images.is_empty() {
            return EditOutcome::Unchanged;
        }
        let draft = &mut self.draft;
        let outcome = match target {
            ImageTarget::Profile => {
                let first = images.into_iter().next().map(ImageSource::from);
                match first {
                    Some(image) => {
                        if assign(&mut draft.profile_image, image) {
                            EditOutcome::Applied
                        } else {
                            EditOutcome::Unchanged
                        }
                    }
                    None => EditOutcome::Unchanged,
                }
            }
            ImageTarget::CertificationGallery => {
                draft
                    .certification_images
                    .extend(images.into_iter().map(ImageSource::from));
                EditOutcome::Applied
            }
            ImageTarget::Portfolio(id) => {
                match draft.portfolio.iter_mut().find(|item| &item.id == id) {
                    Some(item) => {
                        item.images
                            .extend(images.into_iter().map(ImageSource::from));
                        EditOutcome::Applied
                    }
                    None => {
                        log::warn!(
                            "portfolio item {} disappeared during upload, \
                             dropping {} images",
                            id,
                            images.len()
                        );
                        EditOutcome::NotFound
                    }
                }
            }
        };
        self.record(outcome)
    }

    pub fn payload_size(&self) -> Result<usize> {
        self.draft.serialized_size()
    }

    pub fn payload_report(&self, ceiling: usize) -> Result<PayloadReport> {
        Ok(PayloadReport {
            size: self.payload_size()?,
            ceiling,
        })
    }
}

fn remove_position<T>(
    items: &mut Vec<T>,
    index: usize,
    confirm: &mut impl Confirm,
) -> EditOutcome {
    if index >= items.len() {
        log::debug!("positional removal ignored, no position {}", index);
        return EditOutcome::NotFound;
    }
    if !confirm.confirm(REMOVE_PROMPT) {
        return EditOutcome::Declined;
    }
    items.remove(index);
    EditOutcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_snapshot;
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use rstest::rstest;
    use std::collections::HashSet;

    fn yes() -> impl FnMut(&str) -> bool {
        |_| true
    }

    fn no() -> impl FnMut(&str) -> bool {
        |_| false
    }

    fn image(tag: &str) -> InlineImage {
        InlineImage::from_bytes("image/jpeg", tag.as_bytes())
    }

    fn source(tag: &str) -> ImageSource {
        ImageSource::from(image(tag))
    }

    #[test]
    fn add_prepends_template_record() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let originals = copy.snapshot().experience.clone();

        let id = copy.add_record(RecordSection::Experience);

        let experience = &copy.snapshot().experience;
        assert_eq!(experience.len(), 5);
        assert_eq!(experience[0].id, id);
        assert_eq!(experience[0].title, "새로운 경력");
        assert_eq!(&experience[1..], originals.as_slice());
        assert_eq!(id.section_tag(), Some("experience"));
        assert_eq!(copy.revision(), 1);
    }

    #[rstest]
    #[case(RecordSection::Experience, "experience")]
    #[case(RecordSection::Education, "education")]
    #[case(RecordSection::Certifications, "certifications")]
    #[case(RecordSection::Portfolio, "portfolioItems")]
    fn added_ids_are_tagged_with_section(
        #[case] section: RecordSection,
        #[case] tag: &str,
    ) {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let id = copy.add_record(section);
        assert_eq!(id.section_tag(), Some(tag));
    }

    #[test]
    fn portfolio_template_defaults() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let id = copy.add::<PortfolioEntry>();
        let item = copy.get::<PortfolioEntry>(&id).unwrap();
        assert_eq!(item.category, Category::Academic);
        assert!(item.images.is_empty());
        assert_eq!(item.date, "2024");
    }

    #[test]
    fn update_touches_only_the_named_field() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let id = RecordId::from("cert-5");
        let before = copy.get::<CertificationEntry>(&id).unwrap().clone();

        let outcome = copy.update_field(
            &id,
            FieldUpdate::Certification(CertificationField::Title(
                "Renamed".to_owned(),
            )),
        );

        assert_eq!(outcome, EditOutcome::Applied);
        let after = &copy.snapshot().certifications[4];
        assert_eq!(after.title, "Renamed");
        assert_eq!(after.date, before.date);
        assert_eq!(after.organization, before.organization);
        assert_eq!(after.id, before.id);
    }

    #[test]
    fn update_of_unknown_id_is_a_noop() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let outcome = copy.update_field(
            &RecordId::from("exp-99"),
            FieldUpdate::Experience(ExperienceField::Title("x".to_owned())),
        );
        assert_eq!(outcome, EditOutcome::NotFound);
        assert!(!copy.is_dirty());
        assert_eq!(copy.revision(), 0);
    }

    #[test]
    fn update_accepts_empty_text() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let outcome = copy.update_field(
            &RecordId::from("edu-2"),
            FieldUpdate::Education(EducationField::Degree(String::new())),
        );
        assert_eq!(outcome, EditOutcome::Applied);
        assert_eq!(copy.snapshot().education[1].degree, "");
    }

    #[test]
    fn portfolio_category_update() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let id = copy.add::<PortfolioEntry>();
        copy.update_field(
            &id,
            FieldUpdate::Portfolio(PortfolioField::Category(Category::Content)),
        );
        let item = copy.get::<PortfolioEntry>(&id).unwrap();
        assert_eq!(item.category, Category::Content);
    }

    #[test]
    fn remove_requires_confirmation() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let id = RecordId::from("cert-1");

        let declined =
            copy.remove_by_id(RecordSection::Certifications, &id, &mut no());
        assert_eq!(declined, EditOutcome::Declined);
        assert_eq!(copy.snapshot().certifications.len(), 33);

        let mut prompts = Vec::new();
        let removed = copy.remove_by_id(
            RecordSection::Certifications,
            &id,
            &mut |prompt: &str| {
                prompts.push(prompt.to_owned());
                true
            },
        );
        assert_eq!(removed, EditOutcome::Applied);
        assert_eq!(prompts, vec![REMOVE_PROMPT.to_owned()]);
        assert_eq!(copy.snapshot().certifications.len(), 32);
        assert!(copy.get::<CertificationEntry>(&id).is_none());
    }

    #[test]
    fn remove_of_unknown_id_does_not_prompt() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let mut asked = false;
        let outcome = copy.remove_by_id(
            RecordSection::Education,
            &RecordId::from("edu-42"),
            &mut |_: &str| {
                asked = true;
                true
            },
        );
        assert_eq!(outcome, EditOutcome::NotFound);
        assert!(!asked);
    }

    #[rstest]
    #[case(Section::Experience)]
    #[case(Section::Certifications)]
    #[case(Section::Expertise)]
    fn clear_section_empties_the_list(#[case] section: Section) {
        let mut copy = WorkingCopy::open(&default_snapshot());
        assert_eq!(
            copy.clear_section(section, &mut no()),
            EditOutcome::Declined
        );
        assert!(!copy.is_dirty());

        assert_eq!(
            copy.clear_section(section, &mut yes()),
            EditOutcome::Applied
        );
        let value = serde_json::to_value(copy.snapshot()).unwrap();
        assert_eq!(value[section.key()], serde_json::json!([]));
    }

    #[test]
    fn clearing_an_empty_section_is_unchanged() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        assert_eq!(
            copy.clear_section(Section::Portfolio, &mut yes()),
            EditOutcome::Unchanged
        );
        assert_eq!(copy.revision(), 0);
    }

    #[test]
    fn metric_removal_shifts_later_entries() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let before = copy.snapshot().expertise.clone();

        assert_eq!(copy.remove_metric(1, &mut yes()), EditOutcome::Applied);
        let after = &copy.snapshot().expertise;
        assert_eq!(after.len(), 3);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[2]);
        assert_eq!(after[2], before[3]);

        assert_eq!(copy.remove_metric(3, &mut yes()), EditOutcome::NotFound);
        assert_eq!(copy.snapshot().expertise.len(), 3);
    }

    #[test]
    fn metrics_can_be_added_and_edited() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let idx = copy.add_metric();
        assert_eq!(idx, 4);
        assert_eq!(
            copy.update_metric(idx, MetricField::Value("12".to_owned())),
            EditOutcome::Applied
        );
        assert_eq!(
            copy.update_metric(idx, MetricField::Value("12".to_owned())),
            EditOutcome::Unchanged
        );
        assert_eq!(copy.snapshot().expertise[4].value, "12");
        assert_eq!(
            copy.update_metric(9, MetricField::Label("x".to_owned())),
            EditOutcome::NotFound
        );
    }

    #[test]
    fn profile_fields_are_editable() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        copy.set_profile_field(ProfileField::Headline("New".to_owned()));
        copy.set_profile_field(ProfileField::Phone("010-0000-0000".to_owned()));
        assert_eq!(copy.snapshot().headline, "New");
        assert_eq!(copy.snapshot().phone, "010-0000-0000");
        assert_eq!(copy.revision(), 2);
    }

    #[test]
    fn working_copy_never_aliases_origin() {
        let canonical = default_snapshot();
        let mut copy = WorkingCopy::open(&canonical);
        copy.set_profile_field(ProfileField::Name("Someone".to_owned()));
        copy.remove_by_id(
            RecordSection::Experience,
            &RecordId::from("exp-1"),
            &mut yes(),
        );
        assert_eq!(canonical, default_snapshot());
        assert!(copy.is_dirty());
    }

    #[test]
    fn images_land_in_their_targets() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let item = copy.add::<PortfolioEntry>();

        copy.apply_images(&ImageTarget::Profile, vec![image("a"), image("b")]);
        copy.apply_images(
            &ImageTarget::CertificationGallery,
            vec![image("c"), image("d")],
        );
        copy.apply_images(
            &ImageTarget::Portfolio(item.clone()),
            vec![image("e")],
        );

        let snapshot = copy.snapshot();
        assert_eq!(snapshot.profile_image, ImageSource::from(image("a")));
        assert_eq!(
            snapshot.certification_images,
            vec![source("c"), source("d")]
        );
        assert_eq!(snapshot.portfolio[0].images, vec![source("e")]);
    }

    #[test]
    fn portfolio_upload_follows_the_captured_id() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let first = copy.add::<PortfolioEntry>();
        let target = ImageTarget::Portfolio(first.clone());
        // Newer item pushes the target to a different position mid-upload.
        copy.add::<PortfolioEntry>();

        copy.apply_images(&target, vec![image("x")]);

        assert!(copy.snapshot().portfolio[0].images.is_empty());
        assert_eq!(
            copy.get::<PortfolioEntry>(&first).unwrap().images.len(),
            1
        );
    }

    #[test]
    fn upload_for_removed_item_is_dropped() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let item = copy.add::<PortfolioEntry>();
        copy.remove_by_id(RecordSection::Portfolio, &item, &mut yes());
        let outcome =
            copy.apply_images(&ImageTarget::Portfolio(item), vec![image("x")]);
        assert_eq!(outcome, EditOutcome::NotFound);
    }

    #[test]
    fn positional_image_removal() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let item = copy.add::<PortfolioEntry>();
        copy.apply_images(
            &ImageTarget::Portfolio(item.clone()),
            vec![image("1"), image("2"), image("3")],
        );
        copy.apply_images(
            &ImageTarget::CertificationGallery,
            vec![image("4"), image("5")],
        );

        assert_eq!(
            copy.remove_portfolio_image(&item, 1, &mut yes()),
            EditOutcome::Applied
        );
        assert_eq!(
            copy.get::<PortfolioEntry>(&item).unwrap().images,
            vec![source("1"), source("3")]
        );
        assert_eq!(
            copy.remove_certification_image(0, &mut no()),
            EditOutcome::Declined
        );
        assert_eq!(
            copy.remove_certification_image(0, &mut yes()),
            EditOutcome::Applied
        );
        assert_eq!(copy.snapshot().certification_images, vec![source("5")]);
        assert_eq!(
            copy.remove_portfolio_image(&RecordId::from("nope"), 0, &mut yes()),
            EditOutcome::NotFound
        );
    }

    #[test]
    fn payload_report_tracks_inline_images() {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let empty = copy.payload_report(1024 * 1024).unwrap();
        copy.apply_images(
            &ImageTarget::CertificationGallery,
            vec![InlineImage::from_bytes("image/jpeg", &vec![7u8; 4096])],
        );
        let full = copy.payload_report(1024 * 1024).unwrap();
        assert!(full.size > empty.size + 4096);
        assert!(!full.exceeds_ceiling());
        assert!(copy.payload_report(16).unwrap().exceeds_ceiling());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(RecordSection),
        Remove(RecordSection, usize),
    }

    #[derive(Clone, Debug)]
    struct OpSequence(Vec<Op>);

    impl Arbitrary for OpSequence {
        fn arbitrary(g: &mut Gen) -> Self {
            let size = usize::arbitrary(g) % 60 + 1;
            let ops = (0..size)
                .map(|_| {
                    let section = *g.choose(&RecordSection::ALL).unwrap();
                    if u8::arbitrary(g) % 4 == 0 {
                        Op::Remove(section, usize::arbitrary(g))
                    } else {
                        Op::Add(section)
                    }
                })
                .collect();
            OpSequence(ops)
        }
    }

    fn ids_of(
        snapshot: &ProfileSnapshot,
        section: RecordSection,
    ) -> Vec<RecordId> {
        match section {
            RecordSection::Experience => {
                snapshot.experience.iter().map(|r| r.id.clone()).collect()
            }
            RecordSection::Education => {
                snapshot.education.iter().map(|r| r.id.clone()).collect()
            }
            RecordSection::Certifications => {
                snapshot.certifications.iter().map(|r| r.id.clone()).collect()
            }
            RecordSection::Portfolio => {
                snapshot.portfolio.iter().map(|r| r.id.clone()).collect()
            }
        }
    }

    #[quickcheck]
    fn prop_ids_stay_unique(OpSequence(ops): OpSequence) -> bool {
        let mut copy = WorkingCopy::open(&default_snapshot());
        let mut generated = HashSet::new();
        for op in ops {
            match op {
                Op::Add(section) => {
                    if !generated.insert(copy.add_record(section)) {
                        return false;
                    }
                }
                Op::Remove(section, pick) => {
                    let ids = ids_of(copy.snapshot(), section);
                    if let Some(id) = ids.get(pick % ids.len().max(1)) {
                        copy.remove_by_id(section, id, &mut yes());
                    }
                }
            }
        }
        RecordSection::ALL.iter().all(|section| {
            let ids = ids_of(copy.snapshot(), *section);
            ids.iter().collect::<HashSet<_>>().len() == ids.len()
        })
    }

    #[quickcheck]
    fn prop_update_is_idempotent(pick: usize, title: String) -> bool {
        let snapshot = default_snapshot();
        let id = snapshot.certifications[pick % 33].id.clone();
        let update =
            FieldUpdate::Certification(CertificationField::Title(title));

        let mut once = WorkingCopy::open(&snapshot);
        once.update_field(&id, update.clone());
        let mut twice = once.clone();
        let second = twice.update_field(&id, update);

        second == EditOutcome::Unchanged && once.snapshot() == twice.snapshot()
    }

    #[quickcheck]
    fn prop_remove_keeps_relative_order(pick: usize) -> bool {
        let snapshot = default_snapshot();
        let idx = pick % snapshot.certifications.len();
        let id = snapshot.certifications[idx].id.clone();

        let mut copy = WorkingCopy::open(&snapshot);
        copy.remove_by_id(RecordSection::Certifications, &id, &mut yes());

        let mut expected = snapshot.certifications.clone();
        expected.remove(idx);
        copy.snapshot().certifications == expected
    }
}
