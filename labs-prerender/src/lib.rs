//! Build-time pre-render step. Takes the SPA shell, stamps route-specific
//! SEO metadata into it and writes one static HTML file per route, plus a
//! sitemap and robots file. Pure text substitution; no runtime state.

use anyhow::Context;
use serde_json::json;
use std::path::Path;

pub const OG_IMAGE_PATH: &str = "/images/og-cover.png";

#[derive(Debug, Clone)]
pub struct PageMeta {
    pub path: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub keywords: &'static str,
    pub schema_type: &'static str,
}

/// The fixed route list. Blog detail pages are rendered client-side; only
/// the stable marketing routes get static shells.
pub fn routes() -> &'static [PageMeta] {
    const ROUTES: &[PageMeta] = &[
        PageMeta {
            path: "/",
            title: "AI & Automation Consulting | Labs",
            description: "Freelance AI and automation consulting: custom LLM integrations, \
                          workflow automation and rapid prototyping for small teams.",
            keywords: "ai consulting, automation, llm integration, freelance",
            schema_type: "ProfessionalService",
        },
        PageMeta {
            path: "/services",
            title: "Services | Labs",
            description: "Consulting services: AI strategy, process automation, chatbot and \
                          integration builds, and ongoing technical advisory.",
            keywords: "ai services, process automation, chatbots, integrations",
            schema_type: "WebPage",
        },
        PageMeta {
            path: "/verticals",
            title: "Industry Verticals | Labs",
            description: "Automation playbooks for legal, logistics, e-commerce and \
                          professional services teams.",
            keywords: "industry automation, legal tech, logistics, e-commerce",
            schema_type: "WebPage",
        },
        PageMeta {
            path: "/contact",
            title: "Contact | Labs",
            description: "Get in touch for a project estimate or a free intro call.",
            keywords: "contact, ai consultant, project estimate",
            schema_type: "ContactPage",
        },
        PageMeta {
            path: "/labs",
            title: "Labs Blog | Experiments & Write-ups",
            description: "Short write-ups of experiments, demos and client-safe case \
                          studies from the lab bench.",
            keywords: "blog, ai experiments, automation demos",
            schema_type: "Blog",
        },
    ];
    ROUTES
}

/// Structured data for a route, embedded as an `application/ld+json` script.
pub fn json_ld(meta: &PageMeta, base_url: &str) -> serde_json::Value {
    json!({
        "@context": "https://schema.org",
        "@type": meta.schema_type,
        "name": meta.title,
        "description": meta.description,
        "url": format!("{}{}", base_url, meta.path),
    })
}

/// Stamps one route's metadata into the template.
pub fn render_page(template: &str, meta: &PageMeta, base_url: &str) -> String {
    let canonical = format!("{}{}", base_url, meta.path);

    let mut html = set_title(template, meta.title);
    html = set_meta(&html, "name", "description", meta.description);
    html = set_meta(&html, "name", "keywords", meta.keywords);

    html = set_meta(&html, "property", "og:title", meta.title);
    html = set_meta(&html, "property", "og:description", meta.description);
    html = set_meta(&html, "property", "og:type", "website");
    html = set_meta(&html, "property", "og:url", &canonical);
    html = set_meta(
        &html,
        "property",
        "og:image",
        &format!("{}{}", base_url, OG_IMAGE_PATH),
    );

    html = set_meta(&html, "name", "twitter:card", "summary_large_image");
    html = set_meta(&html, "name", "twitter:title", meta.title);
    html = set_meta(&html, "name", "twitter:description", meta.description);

    html = set_canonical(&html, &canonical);

    let ld = json_ld(meta, base_url);
    inject_into_head(
        &html,
        &format!(r#"<script type="application/ld+json">{}</script>"#, ld),
    )
}

pub fn sitemap_xml(base_url: &str) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for meta in routes() {
        xml.push_str(&format!(
            "  <url><loc>{}{}</loc></url>\n",
            base_url, meta.path
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\n\nSitemap: {}/sitemap.xml\n",
        base_url
    )
}

/// Renders every route into `out_dir` (`/` becomes `index.html`, `/services`
/// becomes `services/index.html`), then writes the sitemap and robots files.
pub fn write_site(template: &str, out_dir: &Path, base_url: &str) -> anyhow::Result<usize> {
    let mut written = 0;
    for meta in routes() {
        let html = render_page(template, meta, base_url);
        let target = if meta.path == "/" {
            out_dir.join("index.html")
        } else {
            out_dir.join(meta.path.trim_start_matches('/')).join("index.html")
        };
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&target, html).with_context(|| format!("writing {}", target.display()))?;
        written += 1;
    }

    std::fs::write(out_dir.join("sitemap.xml"), sitemap_xml(base_url))?;
    std::fs::write(out_dir.join("robots.txt"), robots_txt(base_url))?;
    Ok(written)
}

fn inject_into_head(html: &str, tag: &str) -> String {
    match html.find("</head>") {
        Some(pos) => format!("{}  {}\n{}", &html[..pos], tag, &html[pos..]),
        None => format!("{}\n{}", html, tag),
    }
}

fn set_title(html: &str, title: &str) -> String {
    if let (Some(start), Some(end)) = (html.find("<title>"), html.find("</title>")) {
        if start < end {
            return [&html[..start + "<title>".len()], title, &html[end..]].concat();
        }
    }
    inject_into_head(html, &format!("<title>{}</title>", title))
}

/// Rewrites the `content` of the meta tag carrying `attr="key"`, or injects
/// a fresh tag into `<head>` when the template has none.
fn set_meta(html: &str, attr: &str, key: &str, content: &str) -> String {
    let needle = format!("{}=\"{}\"", attr, key);
    if let Some(attr_pos) = html.find(&needle) {
        let tag_start = html[..attr_pos].rfind('<').unwrap_or(0);
        let tag_end = html[attr_pos..]
            .find('>')
            .map(|p| attr_pos + p)
            .unwrap_or(html.len());
        let tag = &html[tag_start..tag_end];
        if let Some(rel) = tag.find("content=\"") {
            let value_start = tag_start + rel + "content=\"".len();
            if let Some(len) = html[value_start..].find('"') {
                return [&html[..value_start], content, &html[value_start + len..]].concat();
            }
        }
        return [
            &html[..tag_start],
            &format!("<meta {} content=\"{}\"", needle, content),
            &html[tag_end..],
        ]
        .concat();
    }
    inject_into_head(
        html,
        &format!("<meta {}=\"{}\" content=\"{}\">", attr, key, content),
    )
}

fn set_canonical(html: &str, href: &str) -> String {
    let needle = "rel=\"canonical\"";
    if let Some(attr_pos) = html.find(needle) {
        let tag_start = html[..attr_pos].rfind('<').unwrap_or(0);
        let tag_end = html[attr_pos..]
            .find('>')
            .map(|p| attr_pos + p)
            .unwrap_or(html.len());
        let tag = &html[tag_start..tag_end];
        if let Some(rel) = tag.find("href=\"") {
            let value_start = tag_start + rel + "href=\"".len();
            if let Some(len) = html[value_start..].find('"') {
                return [&html[..value_start], href, &html[value_start + len..]].concat();
            }
        }
    }
    inject_into_head(html, &format!(r#"<link rel="canonical" href="{}">"#, href))
}
