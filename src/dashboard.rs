//! Corporate dashboard: static mock analytics shown next to the intro.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DepartmentStats {
    pub name: &'static str,
    /// Average path progress, percent.
    pub progress: u8,
    /// Engagement, percent.
    pub engagement: u8,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub progress: u8,
    pub path: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub departments: &'static [DepartmentStats],
    pub overall_completion: u8,
    pub leaderboard: &'static [TeamMember],
}

const DEPARTMENTS: &[DepartmentStats] = &[
    DepartmentStats {
        name: "IT",
        progress: 85,
        engagement: 92,
    },
    DepartmentStats {
        name: "Marketing",
        progress: 72,
        engagement: 88,
    },
    DepartmentStats {
        name: "Finance",
        progress: 65,
        engagement: 78,
    },
    DepartmentStats {
        name: "Sales",
        progress: 91,
        engagement: 95,
    },
    DepartmentStats {
        name: "HR",
        progress: 58,
        engagement: 71,
    },
];

const LEADERBOARD: &[TeamMember] = &[
    TeamMember {
        name: "Alex Johnson",
        role: "Frontend Developer",
        progress: 95,
        path: "React Mastery",
    },
    TeamMember {
        name: "Maria Garcia",
        role: "SEO Specialist",
        progress: 88,
        path: "Advanced SEO",
    },
    TeamMember {
        name: "Chen Wei",
        role: "Financial Analyst",
        progress: 76,
        path: "Quantitative Analysis",
    },
    TeamMember {
        name: "Sarah Miller",
        role: "Junior Developer",
        progress: 62,
        path: "JavaScript Fundamentals",
    },
];

pub const DASHBOARD: Dashboard = Dashboard {
    departments: DEPARTMENTS,
    overall_completion: 78,
    leaderboard: LEADERBOARD,
};

/// Plain-text rendering for the terminal.
pub fn render_text(dashboard: &Dashboard) -> String {
    let mut out = vec!["Corporate Dashboard".to_string()];
    out.push(format!("Overall completion: {}%", dashboard.overall_completion));
    out.push("Team progress by department:".to_string());
    for d in dashboard.departments {
        out.push(format!(
            "  {:<10} progress {:>3}%  engagement {:>3}%",
            d.name, d.progress, d.engagement
        ));
    }
    out.push("Employee leaderboard:".to_string());
    for m in dashboard.leaderboard {
        out.push(format!("  {:>3}%  {} ({}): {}", m.progress, m.name, m.role, m.path));
    }
    out.join("\n")
}
