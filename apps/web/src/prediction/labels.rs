/// Career labels indexed by the classifier's class id.
pub const CAREER_LABELS: [&str; 17] = [
    "Software Engineer",
    "Business Owner",
    "Unknown",
    "Banker",
    "Lawyer",
    "Accountant",
    "Doctor",
    "Real Estate Developer",
    "Stock Investor",
    "Construction Engineer",
    "Artist",
    "Game Developer",
    "Government Officer",
    "Teacher",
    "Designer",
    "Scientist",
    "Writer",
];

pub const UNKNOWN_CAREER: &str = "Unknown Career";

pub fn career_label(class_id: i64) -> &'static str {
    usize::try_from(class_id)
        .ok()
        .and_then(|i| CAREER_LABELS.get(i))
        .copied()
        .unwrap_or(UNKNOWN_CAREER)
}
