//! Shared view helpers.

mod layout;

pub use layout::*;

use northwind_streaming::escape_html;

/// A link styled like the rest of the app. `text` is escaped.
pub fn link(href: &str, text: &str) -> String {
    format!(
        r#"<a class="link" href="{}">{}</a>"#,
        escape_html(href),
        escape_html(text)
    )
}

/// A labelled detail field holding plain text.
pub fn field(label: &str, value: &str) -> String {
    field_html(label, &escape_html(value))
}

/// A labelled detail field holding a link.
pub fn field_link(label: &str, href: &str, text: &str) -> String {
    field_html(label, &link(href, text))
}

fn field_html(label: &str, value_html: &str) -> String {
    format!(
        r#"<div class="field"><label class="label">{}</label><div class="field-body"><div class="field"><div class="control icons-left">{}</div></div></div></div>"#,
        escape_html(label),
        value_html
    )
}

/// Optional text rendered as an empty string when missing.
pub fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// `$x.xx`.
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// A fraction as a whole percentage, e.g. `0.15` as `15%`.
pub fn percent(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round())
}

/// Initials avatar for a display name: first and last word.
pub fn avatar(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = words.next().unwrap_or("");
    let last = words.last().unwrap_or(first);
    avatar_for(&format!("{}-{}", first, last))
}

/// Initials avatar for an explicit seed.
pub fn avatar_for(seed: &str) -> String {
    format!(
        r#"<td class="image-cell"><div class="image"><img alt="" src="https://avatars.dicebear.com/v2/initials/{}.svg" class="rounded-full"></div></td>"#,
        escape_html(seed)
    )
}

/// A simple card holding one heading, used for loading, empty and not
/// found states.
pub fn message(text: &str) -> String {
    format!(
        r#"<div class="card-content"><h2>{}</h2></div>"#,
        escape_html(text)
    )
}

/// Card shown when an entry failed to load.
pub fn error_card(entity: &str) -> String {
    format!(
        r#"<div class="card-content error"><h2>Could not load {}</h2><p>Something went wrong talking to the database. Try again later.</p></div>"#,
        escape_html(entity)
    )
}

pub fn go_back(href: &str) -> String {
    format!(
        r#"<div class="field grouped"><div class="control"><a class="button red" href="{}">Go back</a></div></div>"#,
        escape_html(href)
    )
}

/// A table card. Cells are already rendered `<td>` markup.
pub fn table_card(title: &str, headers: &[&str], rows: &[String]) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();
    let body: String = rows.iter().map(|r| format!("<tr>{}</tr>", r)).collect();
    format!(
        r#"<div class="card has-table"><header class="card-header"><p class="card-header-title">{}</p><a class="card-header-icon" href=""><span class="material-icons">redo</span></a></header><div class="card-content"><table><thead><tr>{}</tr></thead><tbody>{}</tbody></table></div></div>"#,
        escape_html(title),
        head,
        body
    )
}

/// A `<td>` with a mobile label. `html` is inserted as is.
pub fn cell(label: &str, html: &str) -> String {
    format!(r#"<td data-label="{}">{}</td>"#, escape_html(label), html)
}

/// A `<td>` holding escaped text.
pub fn text_cell(label: &str, text: &str) -> String {
    cell(label, &escape_html(text))
}

/// A detail card with a header and two columns of fields.
pub fn detail_card(icon: &str, title: &str, left: &[String], right: &[String], footer: &str) -> String {
    format!(
        r#"<div class="card mb-6"><header class="card-header"><p class="card-header-title"><span class="icon material-icons">{}</span><span class="ml-2">{}</span></p></header><div class="card-content"><div class="grid grid-cols-2 gap-4"><div>{}</div><div>{}</div></div>{}</div></div>"#,
        escape_html(icon),
        escape_html(title),
        left.concat(),
        right.concat(),
        footer
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_and_percent() {
        assert_eq!(money(440.0), "$440.00");
        assert_eq!(money(21.349), "$21.35");
        assert_eq!(percent(0.15), "15%");
        assert_eq!(percent(0.0), "0%");
    }

    #[test]
    fn test_avatar_uses_first_and_last_word() {
        assert!(avatar("Maria Anders").contains("initials/Maria-Anders.svg"));
        assert!(avatar("Ana Maria Trujillo").contains("initials/Ana-Trujillo.svg"));
        assert!(avatar("Cher").contains("initials/Cher-Cher.svg"));
    }

    #[test]
    fn test_field_escapes_values() {
        let html = field("Company Name", "Grandma Kelly's <Homestead>");
        assert!(html.contains(r#"<label class="label">Company Name</label>"#));
        assert!(html.contains("Grandma Kelly&#x27;s &lt;Homestead&gt;"));

        let linked = field_link("Supplier", "/supplier/3", "Tokyo & Co");
        assert!(linked.contains(r#"<a class="link" href="/supplier/3">Tokyo &amp; Co</a>"#));
    }

    #[test]
    fn test_states() {
        assert_eq!(message("No customers..."), r#"<div class="card-content"><h2>No customers...</h2></div>"#);
        assert!(error_card("orders").contains("Could not load orders"));
        assert!(go_back("/orders").contains(r#"<a class="button red" href="/orders">Go back</a>"#));
    }
}
