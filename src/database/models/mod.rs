pub mod academic_year;
pub mod schedule;
pub mod student;
pub mod teacher;
pub mod user;
