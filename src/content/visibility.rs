//! `showIf` wiring: show or hide a field's container whenever the field it
//! depends on changes.

use std::ops::ControlFlow;

use crate::content::builder::{control_value, find_path, UiBindings};
use crate::content::condition::Condition;
use crate::content::field::{walk, FieldDescriptor};
use crate::dom::tree::Dom;
use crate::event::handler::EventKind;

/// Attach a change listener for every `showIf` rule and run it once.
///
/// Rules are processed depth-first, each fully wired before the next.
/// Returns the number of rules wired.
pub fn wire_visibility(dom: &mut Dom, fields: &[Option<FieldDescriptor>], bindings: &UiBindings) -> usize {
    let mut wired = 0;
    let _ = walk(fields, &mut |path, field| {
        let Some(rule) = field.show_if.as_deref().filter(|r| !r.trim().is_empty()) else {
            return ControlFlow::Continue(());
        };
        let condition = match Condition::parse(rule) {
            Ok(condition) => condition,
            Err(err) => {
                tracing::warn!(field = %field.name, rule, %err, "skipping showIf rule");
                return ControlFlow::Continue(());
            }
        };

        let Some(source) = find_path(fields, &condition.source)
            .and_then(|p| bindings.get(&p))
            .and_then(|ui| ui.value_field)
        else {
            tracing::warn!(field = %field.name, source = %condition.source, "showIf source field not found");
            return ControlFlow::Continue(());
        };
        let target = bindings.get(path).and_then(|ui| ui.container);

        tracing::debug!(field = %field.name, %condition, "wiring showIf");
        dom.on(source, EventKind::Change, move |dom, _| {
            let Some(target) = target else {
                return;
            };
            if condition.evaluate(&control_value(dom, source)) {
                dom.show(target);
            } else {
                dom.hide(target);
            }
        });
        dom.change(source);
        wired += 1;
        ControlFlow::Continue(())
    });
    wired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builder::{build, BuildContext};
    use crate::content::engine::EngineOptions;
    use crate::content::field::{FieldKind, FieldPath};
    use crate::content::utils::DefaultUtils;
    use crate::dom::instance::InstanceNo;
    use crate::dom::spec::ElementSpec;

    fn setup(fields: &[Option<FieldDescriptor>]) -> (Dom, UiBindings, usize) {
        let mut dom = Dom::new();
        let host = dom.create(ElementSpec::new("div"));
        let options = EngineOptions::default();
        let ctx = BuildContext {
            instance: InstanceNo::next(),
            options: &options,
            utils: &DefaultUtils,
        };
        let bindings = build(&mut dom, host, fields, &ctx);
        let wired = wire_visibility(&mut dom, fields, &bindings);
        (dom, bindings, wired)
    }

    fn country_region() -> Vec<Option<FieldDescriptor>> {
        vec![
            Some(
                FieldDescriptor::new("country", FieldKind::String)
                    .with_option("LT", "Lithuania")
                    .with_option("US", "United States")
                    .with_value("US"),
            ),
            Some(FieldDescriptor::new("region", FieldKind::String).with_show_if("country == LT")),
        ]
    }

    #[test]
    fn initial_state_is_applied() {
        let fields = country_region();
        let (dom, bindings, wired) = setup(&fields);
        assert_eq!(wired, 1);
        let region = bindings.get(&FieldPath::root(1)).unwrap().container.unwrap();
        assert!(!dom.is_visible(region));
    }

    #[test]
    fn change_toggles_container() {
        let fields = country_region();
        let (mut dom, bindings, _) = setup(&fields);
        let country = bindings.get(&FieldPath::root(0)).unwrap().value_field.unwrap();
        let region = bindings.get(&FieldPath::root(1)).unwrap().container.unwrap();

        dom.set_val(country, "LT");
        dom.change(country);
        assert!(dom.is_visible(region));

        dom.set_val(country, "US");
        dom.change(country);
        assert!(!dom.is_visible(region));
    }

    #[test]
    fn checkbox_source_uses_checked_state() {
        let fields = vec![
            Some(FieldDescriptor::new("subscribe", FieldKind::Bool)),
            Some(FieldDescriptor::new("email", FieldKind::String).with_show_if("subscribe == 1")),
        ];
        let (mut dom, bindings, _) = setup(&fields);
        let flag = bindings.get(&FieldPath::root(0)).unwrap().value_field.unwrap();
        let email = bindings.get(&FieldPath::root(1)).unwrap().container.unwrap();
        assert!(!dom.is_visible(email));

        dom.set_checked(flag, true);
        dom.change(flag);
        assert!(dom.is_visible(email));
    }

    #[test]
    fn rules_inside_groups_are_wired() {
        let fields = vec![
            Some(FieldDescriptor::new("age", FieldKind::Int).with_value(12)),
            Some(FieldDescriptor::group(
                "Adult",
                vec![FieldDescriptor::new("license", FieldKind::String).with_show_if("age >= 18")],
            )),
        ];
        let (mut dom, bindings, wired) = setup(&fields);
        assert_eq!(wired, 1);
        let license = bindings.get(&FieldPath::new([1, 0])).unwrap().container.unwrap();
        assert!(!dom.is_visible(license));

        let age = bindings.get(&FieldPath::root(0)).unwrap().value_field.unwrap();
        dom.set_val(age, "21");
        dom.change(age);
        assert!(dom.is_visible(license));
    }

    #[test]
    fn bad_rules_are_skipped() {
        let fields = vec![
            Some(FieldDescriptor::new("a", FieldKind::String).with_show_if("")),
            Some(FieldDescriptor::new("b", FieldKind::String).with_show_if("a =")),
            Some(FieldDescriptor::new("c", FieldKind::String).with_show_if("nope == 1")),
        ];
        let (_, _, wired) = setup(&fields);
        assert_eq!(wired, 0);
    }
}
