//! Substitution request data and the dropdown sources.

use serde::{Deserialize, Serialize};

/// A lesson substitution request as the backend stores it.
///
/// Serialized with the backend's kebab-case keys. Fields the panel does not
/// edit are kept so an edited request round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReplaceForm {
    pub lesson_date: String,
    pub lesson_time: String,
    pub replace_format: String,
    pub group_number: String,
    pub teacher: String,
    pub subject: String,
    pub module: String,
    pub lesson: String,
    pub reason: String,
    pub replace_transfer: String,
    pub link: String,
    pub imp_info: String,
    pub imp_info2: String,
    pub mentoring_inf_1: String,
    pub mentoring_inf_2: String,
    pub mentoring_inf_3: String,
    pub transfer_time: String,
    pub team_leader: String,
    pub comment: String,
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// A past request with its timing metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub form: ReplaceForm,
    #[serde(rename = "creation-date")]
    pub creation_date: String,
    #[serde(rename = "creation-time")]
    pub creation_time: String,
    #[serde(rename = "remaining-time")]
    pub remaining_time: String,
}

impl HistoryEntry {
    /// One-line summary for the history list.
    pub fn summary(&self) -> String {
        let f = &self.form;
        format!(
            "{} {} | {} | {} | {}",
            f.lesson_date, f.lesson_time, f.group_number, f.subject, f.teacher
        )
    }
}

/// Parse `GET /getHistoryData`. An empty body means no history.
pub fn parse_history(body: &str) -> Result<Vec<HistoryEntry>, serde_json::Error> {
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(body)
}

/// Dropdown contents served by `GET /getData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SelectData {
    pub teachers: Vec<String>,
    pub objects: Vec<String>,
    pub replacement_formats: Vec<String>,
    pub transferment_formats: Vec<String>,
    pub team_leaders: Vec<String>,
}

impl SelectData {
    /// Options for the dropdown with this identifier.
    pub fn options_for(&self, select_id: &str) -> &[String] {
        match select_id {
            "teacher" => &self.teachers,
            "subject" => &self.objects,
            "replace-format" => &self.replacement_formats,
            "replace-transfer" => &self.transferment_formats,
            "team-leader" => &self.team_leaders,
            _ => &[],
        }
    }
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Select,
    Line,
    Multi,
}

/// The editable fields, in screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    LessonDate,
    LessonTime,
    ReplaceFormat,
    GroupNumber,
    Teacher,
    Subject,
    Module,
    Lesson,
    ReplaceTransfer,
    TransferTime,
    TeamLeader,
    Link,
    Reason,
    ImpInfo,
}

impl FormField {
    pub const ALL: [FormField; 14] = [
        FormField::LessonDate,
        FormField::LessonTime,
        FormField::ReplaceFormat,
        FormField::GroupNumber,
        FormField::Teacher,
        FormField::Subject,
        FormField::Module,
        FormField::Lesson,
        FormField::ReplaceTransfer,
        FormField::TransferTime,
        FormField::TeamLeader,
        FormField::Link,
        FormField::Reason,
        FormField::ImpInfo,
    ];

    /// The field's identifier, which is also its JSON key.
    pub fn key(self) -> &'static str {
        match self {
            FormField::LessonDate => "lesson-date",
            FormField::LessonTime => "lesson-time",
            FormField::ReplaceFormat => "replace-format",
            FormField::GroupNumber => "group-number",
            FormField::Teacher => "teacher",
            FormField::Subject => "subject",
            FormField::Module => "module",
            FormField::Lesson => "lesson",
            FormField::ReplaceTransfer => "replace-transfer",
            FormField::TransferTime => "transfer-time",
            FormField::TeamLeader => "team-leader",
            FormField::Link => "link",
            FormField::Reason => "reason",
            FormField::ImpInfo => "imp-info",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            FormField::LessonDate => "Lesson date",
            FormField::LessonTime => "Lesson time",
            FormField::ReplaceFormat => "Format",
            FormField::GroupNumber => "Group",
            FormField::Teacher => "Teacher",
            FormField::Subject => "Subject",
            FormField::Module => "Module",
            FormField::Lesson => "Lesson",
            FormField::ReplaceTransfer => "Replace / transfer",
            FormField::TransferTime => "Transfer time",
            FormField::TeamLeader => "Team leader",
            FormField::Link => "Link",
            FormField::Reason => "Reason",
            FormField::ImpInfo => "Important info",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            FormField::ReplaceFormat
            | FormField::Teacher
            | FormField::Subject
            | FormField::ReplaceTransfer
            | FormField::TeamLeader => FieldKind::Select,
            FormField::Reason | FormField::ImpInfo => FieldKind::Multi,
            _ => FieldKind::Line,
        }
    }

    pub fn get(self, form: &ReplaceForm) -> &str {
        match self {
            FormField::LessonDate => &form.lesson_date,
            FormField::LessonTime => &form.lesson_time,
            FormField::ReplaceFormat => &form.replace_format,
            FormField::GroupNumber => &form.group_number,
            FormField::Teacher => &form.teacher,
            FormField::Subject => &form.subject,
            FormField::Module => &form.module,
            FormField::Lesson => &form.lesson,
            FormField::ReplaceTransfer => &form.replace_transfer,
            FormField::TransferTime => &form.transfer_time,
            FormField::TeamLeader => &form.team_leader,
            FormField::Link => &form.link,
            FormField::Reason => &form.reason,
            FormField::ImpInfo => &form.imp_info,
        }
    }

    pub fn set(self, form: &mut ReplaceForm, value: String) {
        let slot = match self {
            FormField::LessonDate => &mut form.lesson_date,
            FormField::LessonTime => &mut form.lesson_time,
            FormField::ReplaceFormat => &mut form.replace_format,
            FormField::GroupNumber => &mut form.group_number,
            FormField::Teacher => &mut form.teacher,
            FormField::Subject => &mut form.subject,
            FormField::Module => &mut form.module,
            FormField::Lesson => &mut form.lesson,
            FormField::ReplaceTransfer => &mut form.replace_transfer,
            FormField::TransferTime => &mut form.transfer_time,
            FormField::TeamLeader => &mut form.team_leader,
            FormField::Link => &mut form.link,
            FormField::Reason => &mut form.reason,
            FormField::ImpInfo => &mut form.imp_info,
        };
        *slot = value;
    }
}
