//! Product page rendering
//!
//! Produces the complete HTML document for `/` and for the 404/500 paths.
//! The page takes only two inputs: the product list (possibly empty) and an
//! optional error message shown above it.

use std::fmt::Write;

use catalog_core::Product;

const TITLE: &str = "Product Catalog";
const EMPTY_MESSAGE: &str = "No products available";

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f5f5; color: #222; }
header { background: #232f3e; color: #fff; padding: 1.5rem 2rem; }
main { padding: 2rem; }
.error { background: #fde8e8; border: 1px solid #f5b5b5; color: #9b1c1c; padding: 1rem; margin-bottom: 1.5rem; border-radius: 4px; }
.empty { color: #666; font-style: italic; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 1.5rem; }
.product { background: #fff; border-radius: 6px; box-shadow: 0 1px 3px rgba(0,0,0,.12); overflow: hidden; }
.product img, .product .no-image { display: block; width: 100%; height: 180px; object-fit: cover; background: #eee; }
.product .info { padding: 1rem; }
.product .price { color: #b12704; font-weight: bold; }
";

/// Render the catalog page.
pub fn render(products: &[Product], error: Option<&str>) -> String {
    let mut html = String::with_capacity(2048 + products.len() * 320);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{TITLE}</title>");
    let _ = writeln!(html, "<style>\n{STYLE}</style>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<header><h1>{TITLE}</h1></header>");
    html.push_str("<main>\n");

    if let Some(message) = error {
        let _ = writeln!(html, "<div class=\"error\">{}</div>", escape(message));
    }

    if products.is_empty() {
        let _ = writeln!(html, "<p class=\"empty\">{EMPTY_MESSAGE}</p>");
    } else {
        html.push_str("<div class=\"grid\">\n");
        for product in products {
            render_card(&mut html, product);
        }
        html.push_str("</div>\n");
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_card(html: &mut String, product: &Product) {
    let name = escape(product.name_or_empty());
    let image = match &product.image_url {
        Some(url) => format!(
            "<img src=\"{}\" alt=\"{name}\" loading=\"lazy\">",
            escape(url)
        ),
        None => String::from("<div class=\"no-image\"></div>"),
    };
    let _ = writeln!(
        html,
        "<div class=\"product\" data-id=\"{id}\">{image}\
         <div class=\"info\"><h2>{name}</h2><p class=\"price\">${price}</p></div>\
         </div>",
        id = product.id,
        price = product.price,
    );
}

/// Escape text for HTML element content and double-quoted attributes.
fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
