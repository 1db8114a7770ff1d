//! Integration tests for element-forms.
//!
//! These tests exercise the public API from outside the crate, verifying that
//! the element tree, the content engine, the checklist and the testing helpers
//! work together.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use element_forms::content::{ContentEngine, EngineConfig, EngineOptions, FieldDescriptor, FieldKind};
use element_forms::dom::{Dom, DomOptions, ElementSpec, NodeId};
use element_forms::testing::{render_pretty, render_to_string, visible_text, Pilot};
use element_forms::widget::Widget;
use element_forms::widgets::{Checklist, ChecklistLabels, ChecklistOptions, Record};

/// Replace every generated id under `root` with `id1`, `id2`, ... in
/// depth-first order, so snapshots do not depend on instance numbers.
fn redact_ids(dom: &Dom, root: NodeId, html: &str) -> String {
    let mut out = html.to_owned();
    let ids: Vec<String> = dom
        .walk_depth_first(root)
        .into_iter()
        .filter_map(|node| dom.attr(node, "id").map(str::to_owned))
        .collect();
    for (k, id) in ids.iter().enumerate() {
        out = out.replace(&format!("\"{id}\""), &format!("\"id{}\"", k + 1));
    }
    out
}

fn records(value: Value) -> Vec<Record> {
    serde_json::from_value(value).unwrap()
}

// ---------------------------------------------------------------------------
// Element tree
// ---------------------------------------------------------------------------

#[test]
fn test_nested_specs_render() {
    let mut dom = Dom::new();
    let root = dom.create(
        ElementSpec::new("ul")
            .class("menu")
            .children(["One", "Two"].map(|t| ElementSpec::new("li").text(t))),
    );
    assert_eq!(
        render_to_string(&dom, root),
        r#"<ul class="menu"><li>One</li><li>Two</li></ul>"#
    );
}

#[test]
fn test_enforced_ids_use_prefix() {
    let mut dom = Dom::with_options(DomOptions::new().with_enforce_id(true).with_id_prefix("X"));
    let node = dom.create(ElementSpec::new("span"));
    let expected = format!("X{}", dom.get(node).unwrap().instance);
    assert_eq!(dom.attr(node, "id"), Some(expected.as_str()));
}

#[test]
fn test_clear_runs_hooks_once_and_is_idempotent() {
    let mut dom = Dom::new();
    let host = dom.create(
        ElementSpec::new("div")
            .text("header")
            .child(ElementSpec::new("p").text("a"))
            .child(ElementSpec::new("p").text("b")),
    );
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    dom.on_before_clear(host, move |_, _| *counter.borrow_mut() += 1);

    dom.clear(host);
    dom.clear(host);

    assert_eq!(*calls.borrow(), 1);
    assert!(dom.children(host).is_empty());
    assert_eq!(render_to_string(&dom, host), "<div></div>");
}

#[test]
fn test_add_moves_existing_node() {
    let mut dom = Dom::new();
    let a = dom.create(ElementSpec::new("div").id("a"));
    let b = dom.create(ElementSpec::new("div").id("b"));
    let item = dom.add(a, ElementSpec::new("span")).unwrap();
    dom.add(b, item);
    assert!(dom.children(a).is_empty());
    assert_eq!(dom.children(b), &[item]);
    // refusing cycles
    assert_eq!(dom.add(item, b), None);
    assert_eq!(dom.add(b, b), None);
    assert_eq!(dom.parent(item), Some(b));
}

// ---------------------------------------------------------------------------
// Content engine
// ---------------------------------------------------------------------------

#[test]
fn test_single_int_field_snapshot() {
    let mut dom = Dom::new();
    let config = EngineConfig::from_json(
        r#"{ "data": [{ "name": "age", "type": "int", "label": "Age", "value": 30 }] }"#,
    )
    .unwrap();
    let engine = ContentEngine::new(&mut dom, config);
    let html = redact_ids(&dom, engine.root(), &render_pretty(&dom, engine.root()));

    insta::assert_snapshot!(html, @r#"
    <div class="ce-main">
      <div class="ce-data">
        <div class="ce-unit ce-type-int">
          <label for="id1">
            Age
          </label>
          <div>
            <input id="id1" name="age" placeholder="Age" type="number" value="30" />
          </div>
        </div>
      </div>
    </div>
    "#);
}

#[test]
fn test_full_form_sections() {
    let mut dom = Dom::new();
    let config = EngineConfig::from_value(json!({
        "messages": [{ "message": "Check your data", "message-level": 2 }],
        "data": [
            { "name": "id", "type": "id", "label": "ID", "value": 12 },
            { "name": "bio", "type": "text", "label": "Bio", "value": "Hi" },
            { "name": "active", "type": "bool", "label": "Active", "readOnly": true, "value": 1 }
        ]
    }))
    .unwrap()
    .with_command("Save", |_| {});
    let engine = ContentEngine::new(&mut dom, config);
    let html = redact_ids(&dom, engine.root(), &render_pretty(&dom, engine.root()));

    insta::assert_snapshot!(html, @r#"
    <div class="ce-main">
      <div class="ce-messages">
        <div class="ce-msg ce-msg-lvl2">
          Check your data
        </div>
      </div>
      <div class="ce-data">
        <input name="id" type="hidden" value="12" />
        <div class="ce-unit ce-type-id">
          <label for="id1">
            ID
          </label>
          <div>
            <div id="id1">
              12
            </div>
          </div>
        </div>
        <div class="ce-unit ce-type-text">
          <label for="id2">
            Bio
          </label>
          <div>
            <textarea class="ce-textarea" cols="25" id="id2" name="bio" placeholder="Bio" rows="3">
              Hi
            </textarea>
          </div>
        </div>
        <input name="active" type="hidden" value="1" />
        <div class="ce-unit ce-type-bool">
          <label for="id3">
            Active
          </label>
          <div>
            <div id="id3">
              yes
            </div>
          </div>
        </div>
      </div>
      <div class="ce-commands">
        <button class="ce-cmd" type="button">
          Save
        </button>
      </div>
    </div>
    "#);
}

#[test]
fn test_show_if_with_pilot() {
    let mut pilot = Pilot::new();
    let config = EngineConfig::from_value(json!({
        "data": [
            { "name": "country", "type": "string", "label": "Country", "value": "LV",
              "options": { "LT": "Lithuania", "LV": "Latvia" } },
            { "name": "region", "type": "string", "label": "Region", "showIf": "country == LT" }
        ]
    }))
    .unwrap();
    let engine = ContentEngine::new(pilot.dom_mut(), config);
    let country = engine.ui_by_name("country").unwrap().control;
    let region = engine.ui_by_name("region").unwrap().container.unwrap();

    assert!(!pilot.is_displayed(region));
    pilot.select_option(country, "LT");
    assert!(pilot.is_displayed(region));
    assert_eq!(visible_text(pilot.dom(), engine.data_section()), vec![
        "Country", "Lithuania", "Latvia", "Region"
    ]);
    pilot.select_option(country, "LV");
    assert!(!pilot.is_displayed(region));
}

#[test]
fn test_show_if_text_source_initially_visible() {
    let mut pilot = Pilot::new();
    let config = EngineConfig::from_value(json!({
        "data": [
            { "name": "country", "type": "string", "label": "Country", "value": "LT" },
            { "name": "region", "type": "string", "label": "Region", "showIf": "country == LT" }
        ]
    }))
    .unwrap();
    let engine = ContentEngine::new(pilot.dom_mut(), config);
    let country = engine.ui_by_name("country").unwrap().control;
    let region = engine.ui_by_name("region").unwrap().container.unwrap();

    assert_eq!(pilot.dom().tag(country), Some("input"));
    assert!(pilot.is_displayed(region));
    pilot.type_text(country, "LV");
    assert!(!pilot.is_displayed(region));
    pilot.type_text(country, "LT");
    assert!(pilot.is_displayed(region));
}

#[test]
fn test_command_collects_typed_values() {
    let mut pilot = Pilot::new();
    let received = Rc::new(RefCell::new(Value::Null));
    let sink = Rc::clone(&received);
    let config = EngineConfig::new()
        .with_field(FieldDescriptor::new("name", FieldKind::String).with_label("Name"))
        .with_field(FieldDescriptor::new("subscribe", FieldKind::Bool).with_label("Subscribe"))
        .with_field(FieldDescriptor::group(
            "Numbers",
            vec![
                FieldDescriptor::new("count", FieldKind::Int).with_value(1),
                FieldDescriptor::new("ratio", FieldKind::Float).with_default_value("0.5"),
            ],
        ))
        .with_command("Send", move |values| *sink.borrow_mut() = Value::Object(values.clone()));
    let engine = ContentEngine::new(pilot.dom_mut(), config);

    pilot.type_text(engine.ui_by_name("name").unwrap().control, "Ada");
    pilot.toggle(engine.ui_by_name("subscribe").unwrap().control);
    pilot.type_text(engine.ui_by_name("count").unwrap().control, "4");
    let send = engine.command_buttons(pilot.dom())[0];
    pilot.click(send);

    assert_eq!(
        *received.borrow(),
        json!({ "name": "Ada", "subscribe": true, "count": "4", "ratio": "0.5" })
    );
}

#[test]
fn test_enforce_required_blocks_until_filled() {
    let mut pilot = Pilot::new();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let config = EngineConfig::new()
        .with_options(EngineOptions::new().with_enforce_required(true))
        .with_field(FieldDescriptor::new("email", FieldKind::String).with_required(true))
        .with_field(FieldDescriptor::new("age", FieldKind::Int).with_min(18))
        .with_command("Go", move |_| *counter.borrow_mut() += 1);
    let engine = ContentEngine::new(pilot.dom_mut(), config);
    let go = engine.command_buttons(pilot.dom())[0];

    pilot.click(go);
    assert_eq!(*calls.borrow(), 0);

    pilot.type_text(engine.ui_by_name("email").unwrap().control, "a@b.c");
    pilot.type_text(engine.ui_by_name("age").unwrap().control, "16");
    pilot.click(go);
    assert_eq!(*calls.borrow(), 0);

    pilot.type_text(engine.ui_by_name("age").unwrap().control, "20");
    pilot.click(go);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_engine_mounts_under_page() {
    let mut dom = Dom::new();
    let page = dom.create(ElementSpec::new("main"));
    let engine = ContentEngine::new(&mut dom, EngineConfig::new());
    engine.mount(&mut dom, page);
    assert_eq!(dom.parent(engine.root()), Some(page));
    assert_eq!(engine.widget_type(), "ContentEngine");
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

#[test]
fn test_checklist_snapshot() {
    let mut dom = Dom::new();
    let labels = ChecklistLabels {
        invert_selection: None,
        ..ChecklistLabels::default()
    };
    let list = Checklist::new(&mut dom, ChecklistOptions::new().with_labels(labels));
    list.load(&mut dom, records(json!([{ "id": 1, "name": "Apple" }, { "id": 2, "name": "Pear" }])));
    dom.set_checked(list.control(0).unwrap(), true);

    let html = redact_ids(&dom, list.root(), &render_pretty(&dom, list.root()));
    insta::assert_snapshot!(html, @r#"
    <div class="el-checklist">
      <div class="el-checklist-cmds">
        <button class="el-checklist-cmd" type="button">
          Select all
        </button>
        <button class="el-checklist-cmd" type="button">
          Select none
        </button>
      </div>
      <div class="el-checklist-content">
        <div class="el-checklist-option unselectable">
          <input checked id="id1" type="checkbox" />
          <label for="id1">
            Apple
          </label>
        </div>
        <div class="el-checklist-option unselectable">
          <input id="id2" type="checkbox" />
          <label for="id2">
            Pear
          </label>
        </div>
      </div>
    </div>
    "#);
}

#[test]
fn test_checklist_custom_members_and_reload() {
    let mut pilot = Pilot::new();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&changes);
    let options = ChecklistOptions::new()
        .with_value_member(Some("code"))
        .with_name_member(Some("title"))
        .on_sel_change(move |_, item| {
            let entry = item
                .and_then(|r| r.get("code"))
                .map_or_else(|| "*".to_owned(), |v| v.to_string());
            log.borrow_mut().push(entry);
        });
    let list = Checklist::new(pilot.dom_mut(), options);
    list.load(
        pilot.dom_mut(),
        records(json!([{ "code": "a", "title": "A" }, { "code": "b", "title": "B" }])),
    );

    pilot.toggle(list.control(1).unwrap());
    list.select_all(pilot.dom_mut());
    assert_eq!(*changes.borrow(), vec!["\"b\"", "*"]);

    list.select_none(pilot.dom_mut());
    pilot.toggle(list.control(0).unwrap());
    list.load(
        pilot.dom_mut(),
        records(json!([{ "code": "c", "title": "C" }, { "code": "a", "title": "A2" }])),
    );
    let selected: Vec<Value> = list
        .selected_items(pilot.dom())
        .into_iter()
        .map(Value::Object)
        .collect();
    assert_eq!(selected, vec![json!({ "code": "a", "title": "A2" })]);

    list.load(pilot.dom_mut(), Vec::new());
    assert!(list.selected_items(pilot.dom()).is_empty());
}

#[test]
fn test_checklist_invert_twice_is_identity() {
    let mut dom = Dom::new();
    let list = Checklist::new(&mut dom, ChecklistOptions::default());
    list.load(&mut dom, records(json!([{ "id": 1, "name": "x" }, { "id": 2, "name": "y" }, { "id": 3, "name": "z" }])));
    dom.set_checked(list.control(2).unwrap(), true);
    let before = list.selected_items(&dom);
    list.invert_selection(&mut dom);
    assert_eq!(list.selected_items(&dom).len(), 2);
    list.invert_selection(&mut dom);
    assert_eq!(list.selected_items(&dom), before);
}

// ---------------------------------------------------------------------------
// element! macro
// ---------------------------------------------------------------------------

#[cfg(feature = "macros")]
#[test]
fn test_element_macro_builds_specs() {
    use element_forms::element;

    let mut dom = Dom::new();
    let value = 30;
    let node = dom.create(element! {
        <div class="ce-unit">
            <label for="age">"Age"</label>
            <div>
                <input id="age" type="number" value={value} required />
            </div>
        </div>
    });
    assert_eq!(
        render_to_string(&dom, node),
        r#"<div class="ce-unit"><label for="age">Age</label><div><input id="age" required type="number" value="30" /></div></div>"#
    );
}
