// Formas JSON que devuelve la API (nombres de campos compatibles con el front-end).
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Capacity, Interval};

/// `-1` en la base se muestra como texto.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CapacityView {
    Seats(u32),
    Label(&'static str),
}

impl From<Capacity> for CapacityView {
    fn from(c: Capacity) -> Self {
        match c {
            Capacity::Unlimited => CapacityView::Label("unlimited capacity"),
            Capacity::Limited(n) => CapacityView::Seats(n),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub course_name: String,
    pub credit: i64,
    pub title: String,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub credit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrerequisiteName {
    pub course_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub quiz: String,
    pub instructor: String,
    pub capacity: CapacityView,
    pub current_enroll: u32,
    pub schedule_day: String,
    pub schedule_time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureView {
    pub lecture: String,
    pub instructor: String,
    pub capacity: CapacityView,
    pub current_enroll: u32,
    pub schedule_day: String,
    pub schedule_time: String,
    pub quizzes: Vec<QuizView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub course_name: String,
    pub description: String,
    pub department: String,
    pub credit: i64,
    pub pre_requisites: Vec<PrerequisiteName>,
    pub sections: Vec<LectureView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSectionView {
    #[serde(rename = "section_name")]
    pub section_name: String,
    pub instructor: String,
    pub schedule_day: String,
    pub schedule_time: String,
}

impl CartSectionView {
    pub fn new(section_name: String, instructor: String, schedule: &Interval) -> Self {
        CartSectionView {
            section_name,
            instructor,
            schedule_day: schedule.day.to_display(),
            schedule_time: schedule.display_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    #[serde(rename = "courseName")]
    pub course_name: String,
    pub lecture: CartSectionView,
    pub quiz: CartSectionView,
    /// Sólo las filas registradas llevan código.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub added: Vec<CartItem>,
    pub registered: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub course_name: String,
    pub credit: i64,
    pub grade: f64,
}

/// año -> trimestre -> cursos
pub type HistoryView = BTreeMap<String, BTreeMap<String, Vec<HistoryEntry>>>;
