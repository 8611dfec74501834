//! Deterministic demo data, loaded with `talentsync seed`.
//!
//! Existing rows in every collection are deleted first.

use anyhow::Context;
use tracing::info;

use crate::{
    auth::{
        password::hash_password,
        repo_types::{NewUser, Role},
    },
    companies::repo_types::NewCompany,
    db::RecordStore,
    jobs::repo_types::{NewJob, NewJobApplication},
    salaries::repo_types::NewSalary,
};

const COMPANY_COUNT: usize = 50;
const JOB_COUNT: usize = 50;
const SALARY_COUNT: usize = 40;

struct CompanyTemplate {
    name: &'static str,
    city: &'static str,
    state: &'static str,
    employees: i64,
    founded: i32,
    industry: &'static str,
    growjo_ranking: i64,
    previous_ranking: i64,
    estimated_revenues: f64,
    job_openings: i64,
    keywords: &'static str,
    lead_investors: &'static str,
    valuation: f64,
}

const COMPANY_TEMPLATES: [CompanyTemplate; 5] = [
    CompanyTemplate {
        name: "TechNova Labs",
        city: "San Francisco",
        state: "CA",
        employees: 320,
        founded: 2018,
        industry: "Software",
        growjo_ranking: 405,
        previous_ranking: 470,
        estimated_revenues: 18_000_000.0,
        job_openings: 14,
        keywords: "SaaS, Analytics, AI",
        lead_investors: "Sequoia Capital",
        valuation: 95_000_000.0,
    },
    CompanyTemplate {
        name: "GreenGrid Energy",
        city: "Austin",
        state: "TX",
        employees: 125,
        founded: 2015,
        industry: "CleanTech",
        growjo_ranking: 1120,
        previous_ranking: 1350,
        estimated_revenues: 7_200_000.0,
        job_openings: 9,
        keywords: "Renewable, Solar, Battery",
        lead_investors: "Accel",
        valuation: 33_000_000.0,
    },
    CompanyTemplate {
        name: "CareLink Health",
        city: "Chicago",
        state: "IL",
        employees: 540,
        founded: 2012,
        industry: "HealthTech",
        growjo_ranking: 890,
        previous_ranking: 905,
        estimated_revenues: 24_600_000.0,
        job_openings: 21,
        keywords: "Telemedicine, Remote Care, Healthcare",
        lead_investors: "Andreessen Horowitz",
        valuation: 120_000_000.0,
    },
    CompanyTemplate {
        name: "SkyBridge Logistics",
        city: "Denver",
        state: "CO",
        employees: 210,
        founded: 2016,
        industry: "Logistics",
        growjo_ranking: 1350,
        previous_ranking: 1425,
        estimated_revenues: 9_800_000.0,
        job_openings: 12,
        keywords: "Supply Chain, Automation, SaaS",
        lead_investors: "Bessemer Venture Partners",
        valuation: 58_000_000.0,
    },
    CompanyTemplate {
        name: "AquaSense Analytics",
        city: "Seattle",
        state: "WA",
        employees: 160,
        founded: 2017,
        industry: "IoT",
        growjo_ranking: 980,
        previous_ranking: 1025,
        estimated_revenues: 14_500_000.0,
        job_openings: 17,
        keywords: "Sensors, Water Quality, Analytics",
        lead_investors: "Lightspeed Venture Partners",
        valuation: 78_000_000.0,
    },
];

struct JobTemplate {
    title: &'static str,
    salary_range: (i64, i64),
    description: &'static str,
    base_rating: f64,
    size: &'static str,
    industry: &'static str,
    sector: &'static str,
    revenue: &'static str,
    competitors: &'static str,
}

const JOB_TEMPLATES: [JobTemplate; 5] = [
    JobTemplate {
        title: "Frontend Engineer",
        salary_range: (90_000, 120_000),
        description: "Build responsive web applications with modern frameworks while collaborating closely with product and design.",
        base_rating: 4.4,
        size: "201 to 500 employees",
        industry: "Software",
        sector: "Technology",
        revenue: "$10 to $25 million (USD)",
        competitors: "N/A",
    },
    JobTemplate {
        title: "Data Scientist",
        salary_range: (105_000, 145_000),
        description: "Design predictive models, partner with engineering to productionize insights, and coach teams on data best practices.",
        base_rating: 4.6,
        size: "201 to 500 employees",
        industry: "Software",
        sector: "Technology",
        revenue: "$25 to $50 million (USD)",
        competitors: "Snowflake",
    },
    JobTemplate {
        title: "Product Manager",
        salary_range: (98_000, 138_000),
        description: "Define product strategy, prioritize roadmaps, and orchestrate cross-functional execution with measurable outcomes.",
        base_rating: 4.5,
        size: "501 to 1,000 employees",
        industry: "HealthTech",
        sector: "Healthcare",
        revenue: "$25 to $50 million (USD)",
        competitors: "Teladoc Health",
    },
    JobTemplate {
        title: "Energy Systems Analyst",
        salary_range: (82_000, 108_000),
        description: "Analyze renewable energy deployments, identify efficiency gains, and partner with operations on field execution.",
        base_rating: 4.2,
        size: "51 to 200 employees",
        industry: "CleanTech",
        sector: "Energy",
        revenue: "$5 to $10 million (USD)",
        competitors: "SunPower",
    },
    JobTemplate {
        title: "DevOps Engineer",
        salary_range: (97_000, 132_000),
        description: "Automate deployment pipelines, monitor cloud infrastructure, and ensure high availability for mission-critical systems.",
        base_rating: 4.3,
        size: "201 to 500 employees",
        industry: "Software",
        sector: "Technology",
        revenue: "$10 to $25 million (USD)",
        competitors: "HashiCorp",
    },
];

const FIRST_NAMES: [&str; 20] = [
    "Alex", "Jordan", "Taylor", "Casey", "Morgan", "Riley", "Sydney", "Harper", "Parker", "Quinn",
    "Reese", "Dakota", "Emerson", "Hayden", "Rowan", "Sawyer", "Tatum", "Blair", "Dakari", "Elliott",
];

const LAST_NAMES: [&str; 20] = [
    "Johnson", "Garcia", "Patel", "Nguyen", "Brooks", "Santiago", "Rivera", "Hughes", "Foster", "Khan",
    "Walker", "Armstrong", "Ali", "Hernandez", "Diaz", "Singh", "Kim", "Ochoa", "Holland", "Nakamura",
];

fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// 90000 -> "90,000"
fn with_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

fn users() -> [(&'static str, &'static str, &'static str, Role); 3] {
    [
        ("admin", "admin@talentsync.dev", "Admin@123", Role::Admin),
        ("jane_doe", "jane.doe@talentsync.dev", "Password123", Role::User),
        ("employer_portal", "employer@talentsync.dev", "Employer123", Role::Admin),
    ]
}

pub fn companies() -> Vec<NewCompany> {
    (0..COMPANY_COUNT)
        .map(|index| {
            let t = &COMPANY_TEMPLATES[index % COMPANY_TEMPLATES.len()];
            let seq = index as i64 + 1;
            let slug = format!("{}-{seq}", slugify(t.name));
            NewCompany {
                company_name: format!("{} {seq}", t.name),
                city: Some(t.city.into()),
                state: Some(t.state.into()),
                country: Some("USA".into()),
                employees: Some(t.employees + seq * 5),
                founded: Some(t.founded + (seq % 5) as i32),
                industry: Some(t.industry.into()),
                growjo_ranking: Some(t.growjo_ranking + seq * 3),
                previous_ranking: Some(t.previous_ranking + seq * 4),
                estimated_revenues: Some(t.estimated_revenues + seq as f64 * 150_000.0),
                job_openings: Some(t.job_openings + seq % 8),
                keywords: Some(t.keywords.into()),
                lead_investors: Some(t.lead_investors.into()),
                btype: Some("Private".into()),
                valuation: Some(t.valuation + seq as f64 * 850_000.0),
                total_funding: Some(format!("${:.1}M", 40.0 + seq as f64 * 0.75)),
                growth_percentage: Some(format!("{}%", 18 + seq % 8)),
                url: Some(format!("https://www.{slug}.example")),
                linkedin_url: Some(format!("https://www.linkedin.com/company/{slug}")),
                product_url: Some(format!("https://www.{slug}.example/platform")),
                indeed_url: Some(format!("https://www.indeed.com/cmp/{slug}")),
                contact_info: Some(format!("contact+{seq}@{slug}.example")),
            }
        })
        .collect()
}

pub fn jobs(companies: &[NewCompany]) -> Vec<NewJob> {
    (0..JOB_COUNT)
        .map(|index| {
            let t = &JOB_TEMPLATES[index % JOB_TEMPLATES.len()];
            let company = &companies[index % companies.len()];
            let bump = (index as i64 % 6) * 1500;
            let (min, max) = (t.salary_range.0 + bump, t.salary_range.1 + bump + 5000);
            let location = format!(
                "{}, {}",
                company.city.as_deref().unwrap_or_default(),
                company.state.as_deref().unwrap_or_default()
            );
            let rating = ((t.base_rating + (index % 3) as f64 * 0.1) * 10.0).round() / 10.0;
            NewJob {
                title: t.title.into(),
                description: Some(format!("{} Opportunity batch #{}.", t.description, index + 1)),
                salary_estimate: Some(format!("${} - ${}", with_thousands(min), with_thousands(max))),
                company_name: company.company_name.clone(),
                location: Some(location.clone()),
                headquarters: Some(location),
                size: Some(t.size.into()),
                founded: company.founded,
                ownership: Some("Private".into()),
                industry: Some(t.industry.into()),
                sector: Some(t.sector.into()),
                revenue: Some(t.revenue.into()),
                competitors: Some(t.competitors.into()),
                rating: Some(rating),
                easy_apply: index % 2 == 0,
            }
        })
        .collect()
}

pub fn salaries(companies: &[NewCompany]) -> Vec<NewSalary> {
    (0..SALARY_COUNT)
        .map(|index| {
            let company = &companies[index % companies.len()];
            let t = &JOB_TEMPLATES[index % JOB_TEMPLATES.len()];
            let i = index as i64;
            let base = 72_000 + (i % 10) * 4500 + (i / 10) * 6000;
            let overtime = (i % 4) * 1200;
            let other = (i % 5) * 950;
            let total = base + overtime + other;
            let with_benefits = total + 18_000 + (i % 3) * 2500;
            NewSalary {
                external_id: Some(1001 + i),
                employee_name: format!(
                    "{} {}",
                    FIRST_NAMES[index % FIRST_NAMES.len()],
                    LAST_NAMES[(index * 3) % LAST_NAMES.len()]
                ),
                job_title: t.title.into(),
                base_pay: Some(base as f64),
                overtime_pay: Some(overtime as f64),
                other_pay: Some(other as f64),
                total_pay: Some(total as f64),
                total_pay_benefits: Some(with_benefits as f64),
                year: Some(2022 + (index % 4) as i32),
                agency: Some(company.company_name.clone()),
            }
        })
        .collect()
}

fn applications() -> [NewJobApplication; 2] {
    [
        NewJobApplication {
            job_id: "frontend-engineer".into(),
            first_name: "Taylor".into(),
            last_name: "Reed".into(),
            email: "taylor.reed@example.com".into(),
            phone: "5551234400".into(),
            position_applied: "Frontend Engineer".into(),
            cover_letter: "I am passionate about building accessible and performant user experiences.".into(),
            interview_date: "2024-11-18".into(),
            resume: "uploads/sample-resume-taylor.pdf".into(),
        },
        NewJobApplication {
            job_id: "clinical-product-manager".into(),
            first_name: "Jordan".into(),
            last_name: "Nguyen".into(),
            email: "jordan.nguyen@example.com".into(),
            phone: "5559872233".into(),
            position_applied: "Clinical Product Manager".into(),
            cover_letter: "Experience leading healthcare product teams with a focus on patient outcomes.".into(),
            interview_date: "2024-12-04".into(),
            resume: "uploads/sample-resume-jordan.pdf".into(),
        },
    ]
}

pub async fn run(store: &dyn RecordStore) -> anyhow::Result<()> {
    info!("seeding database");
    store.clear_all().await.context("clear collections")?;

    for (username, email, password, role) in users() {
        let user = NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: hash_password(password)?,
            role,
        };
        store.insert_user(&user).await.with_context(|| format!("insert user {email}"))?;
    }

    let companies = companies();
    for c in &companies {
        store.insert_company(c).await.context("insert company")?;
    }
    for j in jobs(&companies) {
        store.insert_job(&j).await.context("insert job")?;
    }
    for s in salaries(&companies) {
        store.insert_salary(&s).await.context("insert salary")?;
    }
    for a in applications() {
        store.insert_application(&a).await.context("insert job application")?;
    }

    info!(
        users = 3,
        companies = companies.len(),
        jobs = JOB_COUNT,
        salaries = SALARY_COUNT,
        "seed data inserted"
    );
    Ok(())
}
