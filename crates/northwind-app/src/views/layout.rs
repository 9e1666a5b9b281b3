//! Page chrome: navbar, sidebar navigation and the settings form.

use northwind_defer::RequestSettings;
use northwind_streaming::{escape_html, swap_script, HeadContent, RegionDelivery, Shell};

use crate::routes::Route;

const NAV_GENERAL: [(&str, &str, &str); 2] = [
    ("/", "home", "Home"),
    ("/dash", "display_settings", "Dashboard"),
];

const NAV_BACKOFFICE: [(&str, &str, &str); 6] = [
    ("/suppliers", "inventory", "Suppliers"),
    ("/products", "production_quantity_limits", "Products"),
    ("/orders", "shopping_cart", "Orders"),
    ("/employees", "badge", "Employees"),
    ("/customers", "group", "Customers"),
    ("/search", "search", "Search"),
];

const SQLITE_LINKS: [(&str, &str); 3] = [
    ("https://blog.cloudflare.com/introducing-d1", "Introducing D1"),
    ("https://www.sqlite.org/lang.html", "SQLite SQL Flavour"),
    (
        "https://developers.cloudflare.com/workers/learning/using-durable-objects/",
        "Durable Objects",
    ),
];

const CLOCK_SCRIPT: &str = r#"(function () {
  function tick() {
    var el = document.getElementById('clock');
    if (el) el.textContent = new Date().toLocaleTimeString();
  }
  tick();
  setInterval(tick, 1000);
})();"#;

/// Build the document shell for a page.
pub fn shell(title: &str, route: &Route, settings: &RequestSettings, delivery: RegionDelivery) -> Shell {
    let mut head = HeadContent::new(title)
        .with_meta("viewport", "width=device-width,initial-scale=1")
        .with_stylesheet("https://fonts.googleapis.com/icon?family=Material+Icons")
        .with_style(STYLES);
    if delivery.needs_swap_script() {
        head = head.with_script(&swap_script());
    }

    let body_start = format!(
        "<body>\n<div id=\"app\">\n{}\n{}\n<section class=\"section main-section\">\n",
        navbar(),
        sidebar(title, route, settings)
    );

    Shell::new(head)
        .with_body_start(body_start)
        .with_body_end(format!(
            "\n</section>\n</div>\n<script>{}</script>\n</body>\n",
            CLOCK_SCRIPT
        ))
}

fn navbar() -> String {
    let links: String = SQLITE_LINKS
        .iter()
        .map(|(href, label)| {
            format!(
                r#"<a href="{}" class="navbar-item"><span class="icon material-icons">link</span><span>{}</span></a>"#,
                href, label
            )
        })
        .collect();

    format!(
        r#"<nav id="navbar-main" class="navbar is-fixed-top"><div class="navbar-menu" id="navbar-menu"><div id="clock" class="navbar-item ml-6"></div><div class="navbar-end"><details class="navbar-item dropdown has-divider"><summary class="navbar-link"><span class="icon material-icons">menu</span><span>SQLite Links</span></summary><div class="navbar-dropdown">{}</div></details></div></div></nav>"#,
        links
    )
}

fn nav_list(items: &[(&str, &str, &str)], active: Option<&str>) -> String {
    items
        .iter()
        .map(|(href, icon, label)| {
            let class = if active == Some(*href) { r#" class="active""# } else { "" };
            format!(
                r#"<li><a href="{}"{}><span class="icon material-icons">{}</span><span class="menu-item-label">{}</span></a></li>"#,
                href, class, icon, label
            )
        })
        .collect()
}

fn sidebar(title: &str, route: &Route, settings: &RequestSettings) -> String {
    let active = route.nav_path();
    let (first, rest) = title.split_once(' ').unwrap_or((title, ""));

    format!(
        r#"<aside class="aside is-placed-left is-expanded"><div class="aside-tools"><div><b class="font-black">{first}</b> {rest}</div></div><div class="menu is-menu-main"><p class="menu-label">General</p><ul class="menu-list">{general}</ul><p class="menu-label">Backoffice</p><ul class="menu-list">{backoffice}</ul>{form}</div></aside>"#,
        first = escape_html(first),
        rest = escape_html(rest),
        general = nav_list(&NAV_GENERAL, active),
        backoffice = nav_list(&NAV_BACKOFFICE, active),
        form = settings_form(settings),
    )
}

/// The delay and load-mode form. Changing the mode submits it.
pub fn settings_form(settings: &RequestSettings) -> String {
    let checked = |on: bool| if on { " checked" } else { "" };
    format!(
        r#"<form method="post" class="mt-4 p-3" onchange="if (event.target.name === 'defer') this.submit()"><div class="field"><label class="label">Data delay (ms)</label><div class="field-body"><div class="field"><div class="control"><input type="text" inputmode="numeric" name="delay" value="{delay}" min="0" class="input"></div></div></div></div><div class="field"><label class="label">Data loading</label><div class="field-body"><div class="field grouped multiline"><div class="control"><label class="radio"><input type="radio" name="defer" value=""{await_checked}><span class="check"></span><span class="control-label">await</span></label></div><div class="control"><label class="radio"><input type="radio" name="defer" value="1"{defer_checked}><span class="check"></span><span class="control-label">defer</span></label></div></div></div></div></form>"#,
        delay = settings.delay_ms,
        await_checked = checked(!settings.should_defer),
        defer_checked = checked(settings.should_defer),
    )
}

const STYLES: &str = r#"
* { box-sizing: border-box; }
body { font-family: Nunito, -apple-system, 'Segoe UI', Roboto, sans-serif; margin: 0; background: #f9fafb; color: #111827; }
.navbar { position: fixed; top: 0; left: 15rem; right: 0; height: 3.5rem; background: #fff; display: flex; align-items: center; padding: 0 1rem; z-index: 30; box-shadow: 0 1px 2px rgba(0,0,0,.05); }
.navbar-menu { display: flex; flex: 1; align-items: center; justify-content: space-between; }
.navbar-item, .navbar-link { display: flex; align-items: center; gap: .5rem; padding: .5rem .75rem; color: #374151; text-decoration: none; cursor: pointer; }
.dropdown { position: relative; }
.navbar-dropdown { position: absolute; right: 0; top: 100%; background: #fff; min-width: 14rem; box-shadow: 0 4px 12px rgba(0,0,0,.1); }
.aside { position: fixed; top: 0; left: 0; bottom: 0; width: 15rem; background: #1f2937; color: #d1d5db; overflow-y: auto; }
.aside-tools { height: 3.5rem; display: flex; align-items: center; padding: 0 .75rem; background: #111827; color: #fff; }
.menu-label { padding: 0 .75rem; margin-top: 1rem; font-size: .75rem; text-transform: uppercase; color: #9ca3af; }
.menu-list { list-style: none; margin: 0; padding: 0; }
.menu-list a { display: flex; align-items: center; gap: .5rem; padding: .5rem .75rem; color: #d1d5db; text-decoration: none; }
.menu-list a.active, .menu-list a:hover { background: #374151; color: #fff; }
.main-section { margin-left: 15rem; padding: 5rem 1.5rem 1.5rem; }
.card { background: #fff; border-radius: .25rem; border: 1px solid #f3f4f6; margin-bottom: 1.5rem; }
.card-header { display: flex; align-items: stretch; border-bottom: 1px solid #f3f4f6; }
.card-header-title { flex: 1; display: flex; align-items: center; padding: .75rem; font-weight: 700; margin: 0; }
.card-header-icon { display: flex; align-items: center; padding: .75rem; color: #6b7280; }
.card-content { padding: 1.5rem; }
.card-content.error h2 { color: #b91c1c; }
.loading { opacity: .6; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: .5rem .75rem; border-bottom: 1px solid #f3f4f6; }
.image-cell img { width: 1.5rem; height: 1.5rem; border-radius: 9999px; }
.link { color: #2563eb; }
.field { margin-bottom: .75rem; }
.label { display: block; font-weight: 700; margin-bottom: .25rem; }
.aside .label { color: #d1d5db; }
.input { width: 100%; padding: .5rem; border: 1px solid #d1d5db; border-radius: .25rem; }
.grouped { display: flex; gap: .75rem; flex-wrap: wrap; }
.button.red { display: inline-block; background: #dc2626; color: #fff; padding: .5rem 1rem; border-radius: .25rem; text-decoration: none; }
.grid { display: grid; }
.grid-cols-2 { grid-template-columns: 1fr 1fr; }
.gap-4 { gap: 1rem; }
.muted { color: #9ca3af; font-size: .875rem; display: block; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_marks_active_route() {
        let shell = shell(
            "Northwind Traders",
            &Route::Customer("ALFKI".to_string()),
            &RequestSettings::default(),
            RegionDelivery::InPlace,
        );
        let opening = shell.render_opening();
        assert!(opening.contains("<title>Northwind Traders</title>"));
        assert!(opening.contains(r#"<a href="/customers" class="active">"#));
        assert!(opening.contains(r#"<b class="font-black">Northwind</b> Traders"#));
        assert!(opening.contains("SQLite Links"));
        assert!(!opening.contains("__nwSwap"));
        assert!(shell.render_closing().ends_with("</html>\n"));
    }

    #[test]
    fn test_settings_form_reflects_settings() {
        let awaiting = settings_form(&RequestSettings::new(0, false));
        assert!(awaiting.contains(r#"name="delay" value="0""#));
        assert!(awaiting.contains(r#"value="" checked"#));
        assert!(!awaiting.contains(r#"value="1" checked"#));

        let deferring = settings_form(&RequestSettings::new(1500, true));
        assert!(deferring.contains(r#"value="1500""#));
        assert!(deferring.contains(r#"value="1" checked"#));
    }

    #[test]
    fn test_defer_shell_includes_swap_script() {
        let shell = shell(
            "Northwind Traders",
            &Route::Orders,
            &RequestSettings::new(100, true),
            RegionDelivery::OutOfOrder,
        );
        assert!(shell.render_opening().contains("function __nwSwap(id)"));
    }
}
