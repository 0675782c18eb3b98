//! Plain HTML rendering for the public pages. Markup is deliberately bare;
//! styling is left to whatever fronts the portal.

use std::fmt::Write;

use url::form_urlencoded;

use crate::core::blog::{BlogListing, PostDetail};
use crate::domain::model::BlogPost;
use crate::server::routes::pages::Product;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<nav><a href=\"/\">Home</a> <a href=\"/blog\">Blog</a> <a href=\"/products\">Shop</a> <a href=\"/request-services\">Request services</a></nav>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

fn latest_posts_sidebar(posts: &[BlogPost]) -> String {
    let mut html = String::from("<aside class=\"latest-posts\">\n<h2>Latest HubSpot Posts</h2>\n<ul>\n");
    for post in posts {
        let _ = writeln!(
            html,
            "<li><a href=\"/post/{}\">{}</a></li>",
            encode(post.id.as_str()),
            escape_html(post.title())
        );
    }
    html.push_str("</ul>\n</aside>");
    html
}

fn listing_link(page: usize, category: &str, search: &str) -> String {
    let mut link = format!("/blog?page={}", page);
    if !category.is_empty() {
        link.push_str(&format!("&category={}", encode(category)));
    }
    if !search.is_empty() {
        link.push_str(&format!("&search={}", encode(search)));
    }
    escape_html(&link)
}

pub fn index_page() -> String {
    layout(
        "Home",
        "<h1>Welcome</h1>\n<p>News, services and products, straight from our HubSpot portal.</p>",
    )
}

pub fn request_services_page() -> String {
    layout(
        "Request services",
        "<h1>Request services</h1>\n<p>Tell us what you need and our team will get back to you.</p>",
    )
}

pub fn products_page(products: &[Product]) -> String {
    let mut body = String::from("<h1>Products</h1>\n<ul class=\"products\">\n");
    for product in products {
        let _ = writeln!(
            body,
            "<li><strong>{}</strong> {}</li>",
            escape_html(product.name),
            escape_html(product.description)
        );
    }
    body.push_str("</ul>");
    layout("Products", &body)
}

pub fn blog_page(listing: &BlogListing) -> String {
    let mut body = String::from("<h1>Blog</h1>\n");

    let _ = writeln!(
        body,
        "<form method=\"get\" action=\"/blog\"><input type=\"search\" name=\"search\" value=\"{}\"><input type=\"hidden\" name=\"category\" value=\"{}\"><button type=\"submit\">Search</button></form>",
        escape_html(&listing.search_query),
        escape_html(&listing.selected_category)
    );

    body.push_str("<ul class=\"categories\">\n<li><a href=\"/blog\">All</a></li>\n");
    for tag in &listing.tags {
        let selected = if tag.name == listing.selected_category {
            " class=\"selected\""
        } else {
            ""
        };
        let _ = writeln!(
            body,
            "<li{}><a href=\"{}\">{}</a></li>",
            selected,
            listing_link(1, &tag.name, &listing.search_query),
            escape_html(&tag.name)
        );
    }
    body.push_str("</ul>\n");

    if listing.posts.is_empty() {
        body.push_str("<p class=\"empty\">No posts found.</p>\n");
    }
    for card in &listing.posts {
        let _ = writeln!(
            body,
            "<article>\n<h2><a href=\"/post/{}\">{}</a></h2>\n<p class=\"date\">{}</p>\n<p class=\"categories\">{}</p>\n</article>",
            encode(card.post.id.as_str()),
            escape_html(card.post.title()),
            escape_html(&card.formatted_publish_date),
            escape_html(&card.category_names.join(", "))
        );
    }

    body.push_str("<nav class=\"pagination\">");
    if listing.page > 1 {
        let _ = write!(
            body,
            "<a rel=\"prev\" href=\"{}\">Previous</a>",
            listing_link(listing.page - 1, &listing.selected_category, &listing.search_query)
        );
    }
    let _ = write!(body, " <span>Page {}</span> ", listing.page);
    if listing.has_next {
        let _ = write!(
            body,
            "<a rel=\"next\" href=\"{}\">Next</a>",
            listing_link(listing.page + 1, &listing.selected_category, &listing.search_query)
        );
    }
    body.push_str("</nav>\n");

    body.push_str(&latest_posts_sidebar(&listing.latest_posts));
    layout("Blog", &body)
}

pub fn post_page(detail: &PostDetail) -> String {
    let post = &detail.post;
    let mut body = format!(
        "<article>\n<h1>{}</h1>\n<p class=\"date\">{}</p>\n",
        escape_html(post.title()),
        escape_html(&detail.created_date)
    );

    if let Some(image) = post.extra_str("featuredImage") {
        let _ = writeln!(
            body,
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(image),
            escape_html(post.title())
        );
    }

    body.push_str("<ul class=\"tags\">\n");
    for name in &detail.category_names {
        let _ = writeln!(body, "<li>{}</li>", escape_html(name));
    }
    body.push_str("</ul>\n");

    let _ = writeln!(
        body,
        "<div class=\"post-body\">{}</div>\n</article>",
        escape_html(post.post_body.as_deref().unwrap_or(""))
    );

    body.push_str(&latest_posts_sidebar(&detail.latest_posts));
    layout(post.title(), &body)
}
