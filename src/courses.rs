//! Static course list with subject filtering and a running credit total.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    /// Catalog code, when the listing shows one.
    pub code: Option<&'static str>,
    pub name: &'static str,
    pub credits: u32,
    pub subject: &'static str,
    pub completed: bool,
}

pub const COURSES: [Course; 4] = [
    Course {
        code: None,
        name: "Intro to Web Development",
        credits: 3,
        subject: "WDD",
        completed: true,
    },
    Course {
        code: None,
        name: "CSE 111",
        credits: 3,
        subject: "CSE",
        completed: false,
    },
    Course {
        code: None,
        name: "HTML & CSS",
        credits: 4,
        subject: "WDD",
        completed: true,
    },
    Course {
        code: None,
        name: "JavaScript Basics",
        credits: 4,
        subject: "WDD",
        completed: false,
    },
];

/// Certificate program listing, shown with codes.
pub const PROGRAM_COURSES: [Course; 5] = [
    program("WDD130", "Web Fundamentals", "WDD", 2, true),
    program("WDD131", "Web Development Basics", "WDD", 3, true),
    program("WDD231", "Intermediate Web Dev", "WDD", 3, false),
    program("CSE110", "Intro to Programming", "CSE", 2, true),
    program("CSE111", "Programming with Functions", "CSE", 3, false),
];

const fn program(
    code: &'static str,
    name: &'static str,
    subject: &'static str,
    credits: u32,
    completed: bool,
) -> Course {
    Course {
        code: Some(code),
        name,
        credits,
        subject,
        completed,
    }
}

impl Course {
    pub fn label(&self) -> String {
        match self.code {
            Some(code) => format!("{} - {}", code, self.name),
            None => self.name.to_string(),
        }
    }
}

/// `all` (or nothing) keeps every course; otherwise the subject code must match.
pub fn filter_courses<'a>(courses: &'a [Course], subject: Option<&str>) -> Vec<&'a Course> {
    match subject.map(str::trim) {
        None | Some("") => courses.iter().collect(),
        Some(s) if s.eq_ignore_ascii_case("all") => courses.iter().collect(),
        Some(s) => courses
            .iter()
            .filter(|c| c.subject.eq_ignore_ascii_case(s))
            .collect(),
    }
}

pub fn total_credits(courses: &[&Course]) -> u32 {
    courses.iter().map(|c| c.credits).sum()
}

pub fn render_text(courses: &[&Course]) -> String {
    let mut out = String::new();
    for c in courses {
        let mark = if c.completed { "x" } else { " " };
        let _ = writeln!(
            out,
            "[{}] {} ({}) - Credits: {}",
            mark,
            c.label(),
            c.subject,
            c.credits
        );
    }
    let _ = writeln!(out, "Total credits: {}", total_credits(courses));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_courses_total_fourteen_credits() {
        let all = filter_courses(&COURSES, Some("all"));
        assert_eq!(all.len(), 4);
        assert_eq!(total_credits(&all), 14);
    }

    #[test]
    fn subject_filter_sums_only_matches() {
        let wdd = filter_courses(&COURSES, Some("WDD"));
        assert_eq!(wdd.len(), 3);
        assert_eq!(total_credits(&wdd), 11);
        let cse = filter_courses(&COURSES, Some("cse"));
        assert_eq!(total_credits(&cse), 3);
        assert!(filter_courses(&COURSES, Some("MATH")).is_empty());
    }

    #[test]
    fn text_listing_marks_completed() {
        let out = render_text(&filter_courses(&COURSES, None));
        assert!(out.contains("[x] HTML & CSS (WDD) - Credits: 4"));
        assert!(out.ends_with("Total credits: 14\n"));
    }

    #[test]
    fn program_listing_shows_codes_and_totals() {
        let all = filter_courses(&PROGRAM_COURSES, Some("all"));
        assert_eq!(total_credits(&all), 13);
        let cse = filter_courses(&PROGRAM_COURSES, Some("CSE"));
        assert_eq!(total_credits(&cse), 5);
        let out = render_text(&cse);
        assert!(out.contains("[x] CSE110 - Intro to Programming (CSE) - Credits: 2"));
        assert!(out.ends_with("Total credits: 5\n"));
    }
}
