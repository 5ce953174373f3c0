#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use folio_web::{FolioApp, section_from_href};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, Element};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("browser test has a document")
}

fn mount(html: &str) -> Element {
    let document = document();
    let root = document.create_element("div").expect("create root");
    root.set_inner_html(html);
    document
        .body()
        .expect("document body")
        .append_child(&root)
        .expect("append root");
    root
}

const PAGE: &str = r##"
<nav class="nav">
  <a class="hero-nav-link" href="#about">About</a>
  <a class="hero-nav-link" href="#experience">Experience</a>
  <a class="hero-nav-link" href="#projects">Projects</a>
</nav>
<section class="section" id="about" style="height: 1200px"></section>
<section class="section" id="experience" style="height: 1200px"></section>
<section class="section" id="projects" style="height: 1200px"></section>
"##;

fn active_links(root: &Element) -> Vec<String> {
    let list = root
        .query_selector_all(".hero-nav-link.active")
        .expect("valid selector");
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .filter_map(|el| el.get_attribute("href"))
        .collect()
}

#[wasm_bindgen_test]
fn start_marks_default_link_and_navigation_moves_it() {
    let root = mount(PAGE);
    let mut app = FolioApp::new().expect("app builds");
    app.start();
    assert_eq!(app.active_section().as_deref(), Some("about"));
    assert_eq!(active_links(&root), vec!["#about".to_string()]);

    assert!(app.navigate("#projects"));
    assert_eq!(app.active_section().as_deref(), Some("projects"));
    assert_eq!(active_links(&root), vec!["#projects".to_string()]);

    assert!(!app.navigate("#missing"));
    assert!(app.take_logs().length() > 0);
    root.remove();
}

#[wasm_bindgen_test]
fn href_parsing_matches_click_handler() {
    assert_eq!(section_from_href("#about").as_deref(), Some("about"));
    assert_eq!(section_from_href("#"), None);
    assert_eq!(section_from_href("https://example.com"), None);
}
