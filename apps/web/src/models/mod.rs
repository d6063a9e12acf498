pub mod academic;
pub mod student;
pub mod subjects;

pub use academic::{AcademicInput, AcademicRecord, Flag};
pub use student::{Gender, Student, StudentInput};
pub use subjects::{Subject, SubjectScores, SubjectScoresInput};
