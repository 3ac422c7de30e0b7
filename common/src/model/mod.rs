pub mod announcement;
pub mod assignment;
pub mod course;
pub mod dashboard;
pub mod enrollment;
pub mod file;
pub mod grade;
pub mod user;
