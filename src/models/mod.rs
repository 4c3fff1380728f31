// Estructuras de datos principales
pub mod views;

use serde::Serialize;
use std::fmt;

pub type StudentId = i64;
pub type CourseId = i64;
pub type MajorId = i64;
pub type SectionId = i64;

/// Valor de `capacity` en la base de datos que significa "sin límite".
pub const UNLIMITED_CAPACITY: i64 = -1;

/// Un passed exige nota estrictamente mayor a este umbral.
pub const PASSING_GRADE: f64 = 2.0;

const DAY_IN_WEEK: [&str; 5] = ["M", "T", "W", "TH", "F"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub netid: StudentId,
    pub full_name: String,
    pub major: MajorId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub major: MajorId,
    pub credit: u32,
    pub prerequisites: Vec<CourseId>,
}

/// Días en que se dicta una sección, codificados como dígitos 1..=5
/// (1=M, 2=T, 3=W, 4=TH, 5=F). Ejemplo: "135" = MWF, "24" = TTH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCode(String);

impl DayCode {
    pub fn parse(raw: &str) -> Option<DayCode> {
        let raw = raw.trim();
        if raw.is_empty() { return None; }
        if !raw.chars().all(|c| ('1'..='5').contains(&c)) { return None; }
        Some(DayCode(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Paridad del valor entero del código; equivale a la paridad del último dígito.
    /// Separa las secciones en dos grupos de días (tipo MWF vs tipo TTH).
    pub fn parity(&self) -> u8 {
        self.0.bytes().last().map(|b| (b - b'0') % 2).unwrap_or(0)
    }

    /// "135" -> "MWF"
    pub fn to_display(&self) -> String {
        self.0
            .bytes()
            .map(|b| DAY_IN_WEEK[(b - b'1') as usize])
            .collect()
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Franja horaria de una sección, en minutos desde medianoche.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub end: u32,
    pub day: DayCode,
}

impl Interval {
    pub fn new(start: u32, end: u32, day: DayCode) -> Self {
        Interval { start, end, day }
    }

    /// 570, 620 -> "9:30 - 10:20"
    pub fn display_time(&self) -> String {
        fn hm(m: u32) -> String { format!("{}:{:02}", m / 60, m % 60) }
        format!("{} - {}", hm(self.start), hm(self.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Unlimited,
    Limited(u32),
}

impl Capacity {
    pub fn from_db(raw: i64) -> Option<Capacity> {
        match raw {
            UNLIMITED_CAPACITY => Some(Capacity::Unlimited),
            n if n >= 0 => u32::try_from(n).ok().map(Capacity::Limited),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Lecture,
    Quiz,
}

/// Una sección (cátedra o quiz). `parent` es el curso para una cátedra y la
/// cátedra para un quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub kind: SectionKind,
    pub name: String,
    pub parent: i64,
    pub capacity: Capacity,
    pub current_enroll: u32,
    pub schedule: Interval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Added,
    Registered,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Added => "added",
            RegistrationStatus::Registered => "registered",
        }
    }

    pub fn parse(raw: &str) -> Option<RegistrationStatus> {
        match raw {
            "added" => Some(RegistrationStatus::Added),
            "registered" => Some(RegistrationStatus::Registered),
            _ => None,
        }
    }
}

/// Fila de `nextquarter` ya resuelta: cátedra + quiz + curso dueño.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub course: Course,
    pub lecture: Section,
    pub quiz: Section,
    pub status: RegistrationStatus,
    pub confirmation_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub course: CourseId,
    pub grade: f64,
    pub school_year: i32,
    pub school_quarter: String,
}

impl HistoryRecord {
    pub fn passed(&self) -> bool {
        self.grade > PASSING_GRADE
    }
}
