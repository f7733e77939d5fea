//! Seed rows and the configuration that sizes them.

use chrono::NaiveDate;

/// Seed data for a level (grade).
pub struct LevelSeed {
    pub id: String,
    pub name: String,
}

/// Seed data for a class inside a level.
pub struct ClassSeed {
    pub id: String,
    pub name: String,
    pub level: String,
}

/// Seed data for a student. `student_id` is filled in at insert time.
pub struct StudentSeed {
    pub student_name_lao: String,
    pub gender: &'static str,
    pub guardian_phone: String,
    pub phone_number: Option<String>,
    pub province: String,
    pub district: String,
    pub village: String,
    pub date_of_birth: NaiveDate,
    /// Index into the seeded classes.
    pub class_idx: usize,
    pub paid: bool,
}

/// Seed data for a registration, built from an inserted student.
pub struct RegistrationSeed {
    pub id: String,
    pub student_id: String,
    pub classroom: String,
    pub level: String,
    pub registration_date: NaiveDate,
    pub paid: bool,
}

pub struct PaymentSeed {
    pub registration_id: String,
    pub amount: f64,
    pub payment_date: NaiveDate,
    pub payment_method: &'static str,
    pub receipt_number: String,
}

pub struct ExamSeed {
    pub registration_id: String,
    pub subject_id: i32,
    pub score: f64,
    pub exam_date: NaiveDate,
}

pub struct AttendanceSeed {
    pub registration_id: String,
    pub date: NaiveDate,
    pub status: &'static str,
}

pub struct TransactionSeed {
    pub transaction_date: NaiveDate,
    pub kind: &'static str,
    pub amount: f64,
    pub description: String,
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    /// First calendar year of the seeded school year, e.g. 2024 for "2024-2025".
    pub start_year: i32,
    pub levels: usize,
    pub classes_per_level: usize,
    pub students_per_class: usize,
    /// Tuition charged per registration.
    pub tuition: f64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            start_year: 2024,
            levels: 4,
            classes_per_level: 2,
            students_per_class: 25,
            tuition: 1_500_000.0,
        }
    }
}

impl SeedConfig {
    /// Creates a new seed configuration for the school year starting in `start_year`.
    pub fn new(start_year: i32) -> Self {
        Self {
            start_year,
            ..Default::default()
        }
    }

    pub fn with_levels(mut self, levels: usize, classes_per_level: usize) -> Self {
        self.levels = levels;
        self.classes_per_level = classes_per_level;
        self
    }

    pub fn with_students_per_class(mut self, students: usize) -> Self {
        self.students_per_class = students;
        self
    }

    pub fn year_id(&self) -> String {
        self.start_year.to_string()
    }

    pub fn period(&self) -> String {
        format!("{}-{}", self.start_year, self.start_year + 1)
    }

    pub fn total_classes(&self) -> usize {
        self.levels * self.classes_per_level
    }

    pub fn total_students(&self) -> usize {
        self.total_classes() * self.students_per_class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let config = SeedConfig::new(2023).with_levels(3, 2).with_students_per_class(10);
        assert_eq!(config.total_classes(), 6);
        assert_eq!(config.total_students(), 60);
        assert_eq!(config.period(), "2023-2024");
        assert_eq!(config.year_id(), "2023");
    }
}
