//! Integration tests for selector matching over `sift-dom` trees.
//!
//! Each test builds a small document, runs a query from the document node
//! and compares the start tags of the matches, in document order.

use sift_dom::{DomTree, TreeBuilder};
use sift_select::NodeExt;

fn build(f: impl FnOnce(&mut TreeBuilder)) -> DomTree {
    let mut builder = TreeBuilder::new();
    f(&mut builder);
    builder.finish()
}

fn assert_selects(tree: &DomTree, query: &str, expected: &[&str]) {
    let got: Vec<String> = tree
        .document()
        .find(query)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(got, expected, "query {query:?}");
}

/// `<ol>` with `count` items whose ids are 1-based positions.
fn ordered_list(count: usize) -> DomTree {
    build(|b| {
        b.open("ol", &[]);
        for i in 1..=count {
            let id = i.to_string();
            b.element("li", &[("id", id.as_str())]);
        }
    })
}

/// `<p>Text block that <span>wraps inner text</span> and continues</p>`
fn text_block() -> DomTree {
    build(|b| {
        b.open("p", &[]);
        b.text("Text block that ");
        b.open("span", &[]);
        b.text("wraps inner text");
        b.close();
        b.text(" and continues");
    })
}

/// Three paragraphs with digit, lower-case and mixed text.
fn digit_paragraphs() -> DomTree {
    build(|b| {
        for (id, text) in [("p1", "0123456789"), ("p2", "abcdef"), ("p3", "0123ABCD")] {
            b.open("p", &[("id", id)]);
            b.text(text);
            b.close();
        }
    })
}

/// A list of links, one `<li><a href>` per entry, separated by newlines.
fn link_list(links: &[(&str, &str)]) -> DomTree {
    build(|b| {
        b.open("ul", &[]);
        for &(id, href) in links {
            b.text("\n");
            b.open("li", &[]);
            b.element("a", &[("id", id), ("href", href)]);
            b.close();
        }
        b.text("\n");
    })
}

#[test]
fn test_type_selector() {
    let tree = build(|b| {
        b.open("body", &[]);
        b.open("address", &[]);
        b.text("This address...");
    });
    assert_selects(&tree, "address", &["<address>"]);
    assert_selects(&tree, "ADDRESS", &["<address>"]);
}

#[test]
fn test_universal_selector() {
    let tree = build(|b| {
        b.open("html", &[]);
        b.element("head", &[]);
        b.element("body", &[]);
    });
    assert_selects(&tree, "*", &["<html>", "<head>", "<body>"]);
}

#[test]
fn test_universal_matches_every_node() {
    let tree = build(|b| {
        b.open("p", &[]);
        b.text("x");
        b.comment("c");
    });
    assert_selects(&tree, "*", &["<p>", "x", "c"]);
    assert_selects(&tree, "p *", &["x", "c"]);
    assert_selects(&tree, "p > :not(span)", &["x", "c"]);
}

#[test]
fn test_id_selectors() {
    let tree = build(|b| {
        b.element("p", &[("id", "foo")]);
        b.element("p", &[("id", "bar")]);
    });
    assert_selects(&tree, "#foo", &["<p id=\"foo\">"]);

    let tree = build(|b| {
        b.open("ul", &[]);
        b.open("li", &[("id", "t1")]);
        b.element("p", &[("id", "t1")]);
    });
    assert_selects(&tree, "li#t1", &["<li id=\"t1\">"]);

    let tree = build(|b| {
        b.open("ol", &[]);
        b.element("li", &[("id", "t4")]);
        b.element("li", &[("id", "t44")]);
    });
    assert_selects(&tree, "*#t4", &["<li id=\"t4\">"]);
}

#[test]
fn test_class_selectors() {
    let tree = build(|b| {
        b.open("ul", &[]);
        b.element("li", &[("class", "t1")]);
        b.element("li", &[("class", "t2")]);
    });
    assert_selects(&tree, ".t1", &["<li class=\"t1\">"]);

    let tree = build(|b| b.element("p", &[("class", "t1 t2")]));
    assert_selects(&tree, "p.t1", &["<p class=\"t1 t2\">"]);
    assert_selects(&tree, ".t1.fail", &[]);
    assert_selects(&tree, "p.t1.t2", &["<p class=\"t1 t2\">"]);

    // Class values compare case-sensitively
    let tree = build(|b| b.element("div", &[("class", "test")]));
    assert_selects(&tree, "div.teST", &[]);

    // Names, not identifiers: a leading digit is fine
    let tree = build(|b| {
        b.element("div", &[("class", "2col")]);
        b.element("div", &[("class", "-1 wide")]);
    });
    assert_selects(&tree, ".2col", &["<div class=\"2col\">"]);
    assert_selects(&tree, "div.-1", &["<div class=\"-1 wide\">"]);
    assert_eq!(tree.document().find(".2col").len(), 1);
}

#[test]
fn test_attribute_presence_and_equality() {
    let tree = build(|b| {
        b.element("p", &[]);
        b.element("p", &[("title", "title")]);
    });
    assert_selects(&tree, "p[title]", &["<p title=\"title\">"]);
    assert_selects(&tree, "p[TITLE]", &["<p title=\"title\">"]);

    let tree = build(|b| {
        b.element("address", &[]);
        b.element("address", &[("title", "foo")]);
        b.element("address", &[("title", "bar")]);
    });
    assert_selects(&tree, "address[title=\"foo\"]", &["<address title=\"foo\">"]);
    assert_selects(&tree, "address[title=foo]", &["<address title=\"foo\">"]);
}

#[test]
fn test_attribute_includes() {
    let tree = build(|b| b.element("p", &[("title", "tot foo bar")]));
    assert_selects(
        &tree,
        "[    title        ~=       foo    ]",
        &["<p title=\"tot foo bar\">"],
    );

    let tree = build(|b| b.element("p", &[("title", "hello world")]));
    assert_selects(&tree, "[title~=\"hello world\"]", &[]);
}

#[test]
fn test_attribute_dash_match() {
    let tree = build(|b| {
        for lang in ["en", "en-gb", "enough", "fr-en"] {
            b.element("p", &[("lang", lang)]);
        }
    });
    assert_selects(&tree, "[lang|=\"en\"]", &["<p lang=\"en\">", "<p lang=\"en-gb\">"]);
}

#[test]
fn test_attribute_substring_operators() {
    let tree = build(|b| {
        b.element("p", &[("title", "foobar")]);
        b.element("p", &[("title", "barfoo")]);
    });
    assert_selects(&tree, "[title^=\"foo\"]", &["<p title=\"foobar\">"]);
    assert_selects(&tree, "[title$=\"bar\"]", &["<p title=\"foobar\">"]);

    let tree = build(|b| b.element("p", &[("title", "foobarufoo")]));
    assert_selects(&tree, "[title*=\"bar\"]", &["<p title=\"foobarufoo\">"]);
}

#[test]
fn test_negation() {
    let tree = build(|b| b.element("p", &[("class", "t1 t2")]));
    assert_selects(&tree, ".t1:not(.t2)", &[]);

    let tree = build(|b| b.element("div", &[("class", "t3")]));
    assert_selects(&tree, "div:not(.t1)", &["<div class=\"t3\">"]);
}

#[test]
fn test_nth_child() {
    let tree = ordered_list(3);
    assert_selects(&tree, "li:nth-child(odd)", &["<li id=\"1\">", "<li id=\"3\">"]);
    assert_selects(&tree, "li:nth-child(even)", &["<li id=\"2\">"]);
    assert_selects(&tree, "li:nth-child(-n+2)", &["<li id=\"1\">", "<li id=\"2\">"]);
    assert_selects(&tree, "li:nth-child(3n+1)", &["<li id=\"1\">"]);
    assert_selects(&tree, "li:nth-child(2)", &["<li id=\"2\">"]);
}

#[test]
fn test_nth_last_child() {
    let tree = ordered_list(4);
    assert_selects(&tree, "li:nth-last-child(odd)", &["<li id=\"2\">", "<li id=\"4\">"]);
    assert_selects(&tree, "li:nth-last-child(even)", &["<li id=\"1\">", "<li id=\"3\">"]);
    assert_selects(&tree, "li:nth-last-child(-n+2)", &["<li id=\"3\">", "<li id=\"4\">"]);
    assert_selects(&tree, "li:nth-last-child(3n+1)", &["<li id=\"1\">", "<li id=\"4\">"]);
}

#[test]
fn test_first_and_last_child_ignore_text() {
    let tree = build(|b| {
        b.open("p", &[]);
        b.text("some text ");
        b.open("span", &[("id", "1")]);
        b.text("and a span");
        b.close();
        b.open("span", &[("id", "2")]);
        b.text(" and another");
    });
    assert_selects(&tree, "span:first-child", &["<span id=\"1\">"]);

    let tree = build(|b| {
        b.open("body", &[]);
        b.open("span", &[]);
        b.text("a span");
        b.close();
        b.text(" and some text");
    });
    assert_selects(&tree, "span:last-child", &["<span>"]);
}

#[test]
fn test_of_type_variants() {
    let tree = build(|b| {
        b.open("body", &[]);
        b.element("address", &[]);
        b.element("p", &[("id", "1")]);
        b.element("p", &[("id", "2")]);
    });
    assert_selects(&tree, "p:nth-of-type(2)", &["<p id=\"2\">"]);
    assert_selects(&tree, "p:nth-last-of-type(2)", &["<p id=\"1\">"]);
    assert_selects(&tree, "p:last-of-type", &["<p id=\"2\">"]);
    assert_selects(&tree, "p:first-of-type", &["<p id=\"1\">"]);
}

#[test]
fn test_only_child() {
    let tree = build(|b| {
        b.open("div", &[]);
        b.element("p", &[("id", "1")]);
        b.element("a", &[]);
        b.close();
        b.open("div", &[]);
        b.element("p", &[("id", "2")]);
    });
    assert_selects(&tree, "p:only-child", &["<p id=\"2\">"]);

    let tree = build(|b| {
        b.open("div", &[]);
        b.element("p", &[("id", "1")]);
        b.element("a", &[]);
        b.close();
        b.open("div", &[]);
        b.element("p", &[("id", "2")]);
        b.element("p", &[("id", "3")]);
    });
    assert_selects(&tree, "p:only-of-type", &["<p id=\"1\">"]);
}

#[test]
fn test_empty() {
    let tree = build(|b| {
        b.open("p", &[("id", "1")]);
        b.comment(" ");
        b.close();
        b.open("p", &[("id", "2")]);
        b.text("Hello");
        b.close();
        b.open("p", &[("id", "3")]);
        b.element("span", &[]);
    });
    assert_selects(&tree, ":empty", &["<p id=\"1\">", "<span>"]);
}

#[test]
fn test_descendant_combinator() {
    let tree = build(|b| {
        b.open("div", &[]);
        b.open("p", &[("id", "1")]);
        b.open("table", &[]);
        b.open("tr", &[]);
        b.open("td", &[]);
        b.element("p", &[("id", "2")]);
        for _ in 0..5 {
            b.close();
        }
        b.element("p", &[("id", "3")]);
    });
    assert_selects(&tree, "div p", &["<p id=\"1\">", "<p id=\"2\">"]);
    assert_selects(&tree, "div table p", &["<p id=\"2\">"]);
}

#[test]
fn test_child_combinator() {
    let tree = build(|b| {
        b.open("div", &[]);
        b.element("p", &[("id", "1")]);
        b.open("div", &[]);
        b.element("p", &[("id", "2")]);
        b.close();
        b.open("table", &[]);
        b.open("tr", &[]);
        b.open("td", &[]);
        b.element("p", &[("id", "3")]);
    });
    assert_selects(&tree, "div > p", &["<p id=\"1\">", "<p id=\"2\">"]);
}

#[test]
fn test_subsequent_sibling_combinator() {
    let tree = build(|b| {
        b.element("p", &[("id", "1")]);
        b.element("p", &[("id", "2")]);
        b.element("address", &[]);
        b.element("p", &[("id", "3")]);
    });
    assert_selects(&tree, "p ~ p", &["<p id=\"2\">", "<p id=\"3\">"]);
    assert_selects(&tree, "p +/*This is a comment*/ p", &["<p id=\"2\">"]);
}

#[test]
fn test_next_sibling_skips_text_and_comments() {
    let tree = build(|b| {
        b.element("p", &[("id", "1")]);
        b.text("\n");
        b.comment("comment");
        b.text("\n                ");
        b.element("p", &[("id", "2")]);
        b.element("address", &[]);
        b.element("p", &[("id", "3")]);
    });
    assert_selects(&tree, "p + p", &["<p id=\"2\">"]);
    assert_selects(&tree, "address + p", &["<p id=\"3\">"]);
}

#[test]
fn test_next_sibling_tests_only_nearest_element() {
    let tree = build(|b| {
        b.element("p", &[("id", "1")]);
        b.element("address", &[]);
        b.text("x");
        b.element("p", &[("id", "2")]);
    });
    assert_selects(&tree, "p + p", &[]);
    assert_selects(&tree, "p ~ p", &["<p id=\"2\">"]);
}

#[test]
fn test_selector_group_keeps_document_order() {
    let tree = build(|b| {
        b.open("ul", &[]);
        b.element("li", &[]);
        b.element("li", &[]);
        b.close();
        b.element("p", &[]);
    });
    assert_selects(&tree, "li, p", &["<li>", "<li>", "<p>"]);
    assert_selects(&tree, "p, li", &["<li>", "<li>", "<p>"]);
}

#[test]
fn test_contains() {
    let tree = text_block();
    assert_selects(&tree, "p:contains(\"that wraps\")", &["<p>"]);
    assert_selects(&tree, "p:contains(\"TEXT BLOCK\")", &["<p>"]);
    assert_selects(&tree, "p:containsOwn(\"that wraps\")", &[]);
    assert_selects(&tree, ":containsOwn(\"inner\")", &["<span>"]);
    assert_selects(&tree, "p:containsOwn(\"block\")", &["<p>"]);
    assert_selects(&tree, ":contains(inner)", &["<p>", "<span>", "wraps inner text"]);
}

#[test]
fn test_text_selectors_match_text_and_comment_nodes() {
    let tree = build(|b| {
        b.open("div", &[]);
        b.text("Alpha");
        b.comment("beta note");
        b.open("em", &[]);
        b.text("gamma");
    });
    assert_selects(&tree, ":contains(alpha)", &["<div>", "Alpha"]);
    assert_selects(&tree, ":contains(beta)", &["beta note"]);
    assert_selects(&tree, ":contains(gamma)", &["<div>", "<em>", "gamma"]);
    assert_selects(&tree, ":matches(^gam)", &["<em>", "gamma"]);

    // A text node has no text children of its own
    assert_selects(&tree, ":containsOwn(alpha)", &["<div>"]);
    assert_selects(&tree, ":matchesOwn(note)", &[]);
}

#[test]
fn test_has() {
    let tree = build(|b| {
        b.open("div", &[("id", "d1")]);
        b.open("p", &[("id", "p1")]);
        b.open("span", &[]);
        b.text("text content");
        for _ in 0..3 {
            b.close();
        }
        b.element("div", &[("id", "d2")]);
    });
    assert_selects(&tree, "div:has(#p1)", &["<div id=\"d1\">"]);
    assert_selects(&tree, "div:has(span)", &["<div id=\"d1\">"]);
    assert_selects(&tree, "div:hasChild(#p1)", &["<div id=\"d1\">"]);
    assert_selects(&tree, "div:hasChild(span)", &[]);

    let tree = build(|b| {
        b.open("div", &[("id", "d1")]);
        b.open("p", &[("id", "p1")]);
        b.open("span", &[]);
        b.text("contents 1");
        for _ in 0..3 {
            b.close();
        }
        b.text("\n");
        b.open("div", &[("id", "d2")]);
        b.open("p", &[]);
        b.text("contents ");
        b.open("em", &[]);
        b.text("2");
    });
    assert_selects(&tree, "div:has(:containsOwn(\"2\"))", &["<div id=\"d2\">"]);
}

#[test]
fn test_matches() {
    let tree = digit_paragraphs();
    let cases: [(&str, &[&str]); 7] = [
        (r"p:matches([\d])", &["<p id=\"p1\">", "<p id=\"p3\">"]),
        ("p:matches([a-z])", &["<p id=\"p2\">"]),
        ("p:matches([a-zA-Z])", &["<p id=\"p2\">", "<p id=\"p3\">"]),
        (r"p:matches([^\d])", &["<p id=\"p2\">", "<p id=\"p3\">"]),
        ("p:matches(^(0|a))", &["<p id=\"p1\">", "<p id=\"p2\">", "<p id=\"p3\">"]),
        (r"p:matches(^\d+$)", &["<p id=\"p1\">"]),
        (r"p:not(:matches(^\d+$))", &["<p id=\"p2\">", "<p id=\"p3\">"]),
    ];
    for (query, expected) in cases {
        assert_selects(&tree, query, expected);
    }
}

#[test]
fn test_matches_own() {
    let tree = text_block();
    assert_selects(&tree, "p:matches(wraps)", &["<p>"]);
    assert_selects(&tree, "p:matchesOwn(wraps)", &[]);
    assert_selects(&tree, "p:matchesOwn(^Text)", &["<p>"]);
}

#[test]
fn test_regex_attribute() {
    let tree = link_list(&[
        ("a1", "http://www.google.com/finance"),
        ("a2", "http://finance.yahoo.com/"),
        ("a2", "http://finance.untrusted.com/"),
        ("a3", "https://www.google.com/news"),
        ("a4", "http://news.yahoo.com"),
    ]);
    assert_selects(
        &tree,
        r"[href#=(fina)]:not([href#=(\/\/[^\/]+untrusted)])",
        &[
            "<a id=\"a1\" href=\"http://www.google.com/finance\">",
            "<a id=\"a2\" href=\"http://finance.yahoo.com/\">",
        ],
    );

    let tree = link_list(&[
        ("a1", "http://www.google.com/finance"),
        ("a2", "http://finance.yahoo.com/"),
        ("a3", "https://www.google.com/news"),
        ("a4", "http://news.yahoo.com"),
    ]);
    assert_selects(
        &tree,
        r"[href#=(^https:\/\/[^\/]*\/?news)]",
        &["<a id=\"a3\" href=\"https://www.google.com/news\">"],
    );
}

#[test]
fn test_input() {
    let tree = build(|b| {
        b.open("form", &[]);
        b.open("label", &[]);
        b.text("Username ");
        b.element("input", &[("type", "text"), ("name", "username")]);
        b.close();
        b.open("label", &[]);
        b.text("Password ");
        b.element("input", &[("type", "password"), ("name", "password")]);
        b.close();
        b.open("label", &[]);
        b.text("Country\n");
        b.open("select", &[("name", "country")]);
        b.open("option", &[("value", "ca")]);
        b.text("Canada");
        b.close();
        b.open("option", &[("value", "us")]);
        b.text("United States");
        b.close();
        b.close();
        b.close();
        b.open("label", &[]);
        b.text("Bio ");
        b.element("textarea", &[("name", "bio")]);
        b.close();
        b.open("button", &[]);
        b.text("Sign up");
    });
    assert_selects(
        &tree,
        ":input",
        &[
            "<input type=\"text\" name=\"username\">",
            "<input type=\"password\" name=\"password\">",
            "<select name=\"country\">",
            "<textarea name=\"bio\">",
            "<button>",
        ],
    );
}

#[test]
fn test_root_link_and_form_states() {
    let tree = build(|b| {
        b.doctype("html");
        b.open("html", &[]);
        b.open("body", &[]);
        b.element("a", &[("href", "/home")]);
        b.element("a", &[("name", "anchor")]);
        b.element("area", &[("href", "/map")]);
        b.element("input", &[("disabled", "")]);
        b.element("button", &[]);
        b.element("div", &[]);
        b.element("div", &[("disabled", "")]);
    });
    assert_selects(&tree, ":root", &["<html>"]);
    assert_selects(&tree, ":link", &["<a href=\"/home\">", "<area href=\"/map\">"]);
    assert_selects(&tree, ":disabled", &["<input disabled=\"\">"]);
    assert_selects(&tree, ":input:enabled", &["<button>"]);

    // Only form controls have an enabled state
    assert_selects(&tree, ":enabled", &["<button>"]);
    assert_selects(&tree, "div:enabled", &[]);
    assert_selects(&tree, "div:disabled", &[]);
}
