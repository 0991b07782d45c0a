//! Advisory text keyed on GPA bands.

/// Three standing insights for a GPA.
pub fn standing_insights(gpa: f64) -> Vec<&'static str> {
    if gpa >= 3.8 {
        vec![
            "Exceptional academic performance! You're in the top tier of students.",
            "Consider applying for prestigious scholarships and honors programs.",
            "You might be ready for advanced research opportunities.",
        ]
    } else if gpa >= 3.5 {
        vec![
            "Excellent academic standing! Keep up the outstanding work.",
            "Consider applying for honors programs or research positions.",
            "You're well-positioned for graduate school applications.",
        ]
    } else if gpa >= 3.0 {
        vec![
            "Good academic standing. Focus on maintaining consistency.",
            "Consider joining study groups for collaborative learning.",
            "You're on track for most graduate programs.",
        ]
    } else if gpa >= 2.5 {
        vec![
            "You're making progress. Focus on improving study habits.",
            "Consider seeking academic support or tutoring.",
            "Regular attendance and study time will help improve your GPA.",
        ]
    } else {
        vec![
            "Focus on fundamental study strategies and time management.",
            "Consider meeting with academic advisors for guidance.",
            "Don't hesitate to seek help from professors and tutors.",
        ]
    }
}

/// Five concrete recommendations for a (predicted) GPA.
pub fn academic_recommendations(gpa: f64) -> Vec<&'static str> {
    if gpa < 2.5 {
        vec![
            "Increase study hours to at least 25 hours per week",
            "Improve attendance to above 90%",
            "Seek help from professors during office hours",
            "Consider reducing course load if possible",
            "Join study groups for collaborative learning",
        ]
    } else if gpa < 3.0 {
        vec![
            "Maintain consistent study schedule of 20+ hours per week",
            "Improve attendance to above 85%",
            "Participate more actively in class discussions",
            "Form study groups with classmates",
            "Seek tutoring for challenging subjects",
        ]
    } else if gpa < 3.5 {
        vec![
            "Maintain consistent study schedule",
            "Participate more actively in class discussions",
            "Form study groups with classmates",
            "Consider taking advanced courses",
            "Explore research opportunities",
        ]
    } else {
        vec![
            "Consider taking advanced or honors courses",
            "Explore research opportunities",
            "Mentor other students",
            "Apply for prestigious scholarships",
            "Consider early graduate school preparation",
        ]
    }
}
