use log::debug;

use crate::components::blog_grid::BlogGridComponent;
use crate::types::{BlogLibrary, Portfolio};
use crate::utils::{escape_attr, escape_html};

const TEASER_CATEGORIES: usize = 3;
const TEASER_POSTS: usize = 2;

/// Landing page sections built from `portfolio.json`
pub struct PortfolioComponent<'a> {
    portfolio: &'a Portfolio,
    library: &'a BlogLibrary,
}

impl<'a> PortfolioComponent<'a> {
    pub fn new(portfolio: &'a Portfolio, library: &'a BlogLibrary) -> Self {
        Self { portfolio, library }
    }

    /// Page title: the owner's name when known
    pub fn title(&self) -> &str {
        if self.portfolio.personal.name.is_empty() {
            "Portfolio"
        } else {
            &self.portfolio.personal.name
        }
    }

    pub fn render(&self) -> String {
        debug!(
            "Rendering landing page: {} experiences, {} projects",
            self.portfolio.experiences.len(),
            self.portfolio.projects.len()
        );
        let mut html = String::new();
        html.push_str(&self.hero());
        html.push_str(&self.about());
        html.push_str(&self.experience());
        html.push_str(&self.skills());
        html.push_str(&self.projects());
        html.push_str(&self.certifications());
        html.push_str(&format!(
            "<section id=\"blogs\" class=\"section\"><h2>Latest Writing</h2>{}<a class=\"button\" href=\"/blogs\">View all blogs</a></section>",
            BlogGridComponent::new(self.library).render(Some(TEASER_CATEGORIES), TEASER_POSTS)
        ));
        html.push_str(&self.contact());
        html
    }

    fn hero(&self) -> String {
        let personal = &self.portfolio.personal;
        let mut html = format!(
            "<section id=\"hero\" class=\"hero\"><h1>{}</h1>",
            escape_html(self.title())
        );
        if !personal.title.is_empty() {
            html.push_str(&format!("<p class=\"subtitle\">{}</p>", escape_html(&personal.title)));
        }
        if !personal.bio.is_empty() {
            html.push_str(&format!("<p class=\"bio\">{}</p>", escape_html(&personal.bio)));
        }
        html.push_str("<div class=\"actions\"><a class=\"button\" href=\"#contact\">Get in touch</a>");
        if let Some(resume) = personal.resume_url.as_deref() {
            html.push_str(&format!(
                "<a class=\"button secondary\" href=\"{}\">Resume</a>",
                escape_attr(resume)
            ));
        }
        html.push_str("</div></section>");
        html
    }

    fn about(&self) -> String {
        let about = &self.portfolio.personal.about;
        if about.is_empty() {
            return String::new();
        }
        let paragraphs: String = about
            .split("\n\n")
            .filter(|p| !p.trim().is_empty())
            .map(|p| format!("<p>{}</p>", escape_html(p.trim())))
            .collect();
        format!("<section id=\"about\" class=\"section\"><h2>About</h2>{}</section>", paragraphs)
    }

    fn experience(&self) -> String {
        if self.portfolio.experiences.is_empty() {
            return String::new();
        }
        let mut html = String::from("<section id=\"experience\" class=\"section\"><h2>Experience</h2><ol class=\"timeline\">");
        for exp in &self.portfolio.experiences {
            html.push_str(&format!(
                "<li><h3>{} <span class=\"company\">@ {}</span></h3><p class=\"meta\">{}",
                escape_html(&exp.title),
                escape_html(&exp.company),
                escape_html(&exp.date)
            ));
            if !exp.location.is_empty() {
                html.push_str(&format!(" · {}", escape_html(&exp.location)));
            }
            html.push_str("</p>");
            if !exp.description.is_empty() {
                html.push_str("<ul>");
                for line in &exp.description {
                    html.push_str(&format!("<li>{}</li>", escape_html(line)));
                }
                html.push_str("</ul>");
            }
            html.push_str("</li>");
        }
        html.push_str("</ol></section>");
        html
    }

    fn skills(&self) -> String {
        if self.portfolio.skills.is_empty() {
            return String::new();
        }
        let mut html = String::from("<section id=\"skills\" class=\"section\"><h2>Skills</h2><div class=\"skill-grid\">");
        for group in &self.portfolio.skills {
            html.push_str(&format!("<div class=\"skill-group\"><h3>{}</h3><ul>", escape_html(&group.category)));
            for skill in &group.skills {
                html.push_str(&format!("<li>{}</li>", escape_html(skill)));
            }
            html.push_str("</ul></div>");
        }
        html.push_str("</div></section>");
        html
    }

    fn projects(&self) -> String {
        if self.portfolio.projects.is_empty() {
            return String::new();
        }
        let mut html = String::from("<section id=\"projects\" class=\"section\"><h2>Projects</h2><div class=\"project-grid\">");
        for project in &self.portfolio.projects {
            html.push_str("<article class=\"project-card\">");
            if let Some(image) = project.image_url.as_deref() {
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\">",
                    escape_attr(image),
                    escape_attr(&project.title)
                ));
            }
            html.push_str(&format!(
                "<h3>{}</h3><p>{}</p>",
                escape_html(&project.title),
                escape_html(&project.description)
            ));
            if !project.tags.is_empty() {
                html.push_str("<ul class=\"tags\">");
                for tag in &project.tags {
                    html.push_str(&format!("<li class=\"tag\">{}</li>", escape_html(tag)));
                }
                html.push_str("</ul>");
            }
            for (label, url) in [("Demo", &project.demo_url), ("Code", &project.github_url)] {
                if let Some(url) = url.as_deref() {
                    html.push_str(&format!(
                        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                        escape_attr(url),
                        label
                    ));
                }
            }
            html.push_str("</article>");
        }
        html.push_str("</div></section>");
        html
    }

    fn certifications(&self) -> String {
        if self.portfolio.certifications.is_empty() {
            return String::new();
        }
        let mut html = String::from("<section id=\"certifications\" class=\"section\"><h2>Certifications</h2><ul class=\"certifications\">");
        for cert in &self.portfolio.certifications {
            html.push_str(&format!(
                "<li><strong>{}</strong> <span class=\"meta\">{} · {}</span>",
                escape_html(&cert.title),
                escape_html(&cert.issuer),
                escape_html(&cert.date)
            ));
            if let Some(description) = cert.description.as_deref() {
                html.push_str(&format!("<p>{}</p>", escape_html(description)));
            }
            if let Some(url) = cert.credential_url.as_deref() {
                html.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">View credential</a>",
                    escape_attr(url)
                ));
            }
            html.push_str("</li>");
        }
        html.push_str("</ul></section>");
        html
    }

    fn contact(&self) -> String {
        let personal = &self.portfolio.personal;
        let mut html = String::from("<section id=\"contact\" class=\"section\"><h2>Contact</h2><ul class=\"contact\">");
        if !personal.email.is_empty() {
            html.push_str(&format!(
                "<li><a href=\"mailto:{}\">{}</a></li>",
                escape_attr(&personal.email),
                escape_html(&personal.email)
            ));
        }
        if let Some(phone) = personal.phone_number.as_deref() {
            html.push_str(&format!("<li>{}</li>", escape_html(phone)));
        }
        if !personal.location.is_empty() {
            html.push_str(&format!("<li>{}</li>", escape_html(&personal.location)));
        }
        html.push_str("</ul><ul class=\"social\">");
        for link in &self.portfolio.social_links {
            html.push_str(&format!(
                "<li><a class=\"icon-{}\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
                escape_attr(&link.icon),
                escape_attr(&link.url),
                escape_html(&link.name)
            ));
        }
        html.push_str("</ul></section>");
        html
    }
}
