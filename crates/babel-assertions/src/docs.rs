//! Markdown reference for the registered assertion types.

use crate::handler::{AppliesTo, AssertionHandler};
use crate::registry::AssertionRegistry;
use std::collections::HashSet;

const INTRO: &str = "\
<!-- AUTO-GENERATED. Do not edit by hand.
     Regenerate with: babel-validate docs --path crates/babel-assertions/README.md -->

# BabelTest Assertion Types

These are the assertion types that can be embedded in GitHub issue bodies and evaluated against the NodeNorm and NameRes services.

## Embedding Tests in Issues

Two syntaxes are supported:

**Wiki syntax** (one assertion per line):
```
{{BabelTest|AssertionType|param1|param2|...}}
```

**YAML syntax** (multiple assertions, multiple param sets):
````
```yaml
babel_tests:
  AssertionType:
    - param1
    - [param1, param2]
```
````

Assertion names are case-insensitive.

---
";

const ADDING_NEW: &str = "\
## Adding a New Assertion Type

1. Pick the module in `crates/babel-assertions/src/handlers/`:
   - `nodenorm.rs` for NodeNorm-only assertions (`AppliesTo::NodeNorm`, implement `test_with_nodenorm`)
   - `nameres.rs` for NameRes-only assertions (`AppliesTo::NameRes`, implement `test_with_nameres`)
   - `common.rs` for assertions that apply to both services (`AppliesTo::Both`, implement both methods)

2. Give it a `static` `HandlerDoc` and return it from `AssertionHandler::doc`.

3. Add it to `AssertionRegistry::builtin`.

4. Run `babel-validate docs --path crates/babel-assertions/README.md` to regenerate this file.
";

fn group_header(applies_to: AppliesTo) -> &'static str {
    match applies_to {
        AppliesTo::NodeNorm => {
            "## NodeNorm Assertions\n\n\
             These assertions test the [NodeNorm](https://nodenorm.transltr.io/docs) service."
        }
        AppliesTo::NameRes => {
            "## NameRes Assertions\n\n\
             These assertions test the [NameRes](https://name-lookup.transltr.io/docs) service."
        }
        AppliesTo::Both => "## Special Assertions",
    }
}

fn render_handler(handler: &dyn AssertionHandler) -> String {
    let doc = handler.doc();
    let mut parts = vec![
        format!("### {}\n", doc.display_name),
        format!("**Applies to:** {}\n", handler.applies_to()),
        format!("{}\n", doc.description),
    ];
    if !doc.parameters.is_empty() {
        parts.push(format!("**Parameters:** {}\n", doc.parameters));
    }
    parts.push(format!(
        "**Wiki syntax:**\n```\n{}\n```\n",
        doc.wiki_examples.join("\n")
    ));
    parts.push(format!(
        "**YAML syntax:**\n```yaml\nbabel_tests:\n  {}:\n{}\n```\n",
        doc.display_name, doc.yaml_params
    ));
    parts.push("---\n".to_string());
    parts.join("\n")
}

/// Render the assertion reference, grouped by the services each handler covers.
pub fn generate_readme(registry: &AssertionRegistry) -> String {
    let mut sections = vec![INTRO.to_string()];
    let mut seen = HashSet::new();

    for handler in registry.handlers() {
        let applies_to = handler.applies_to();
        if seen.insert(applies_to) {
            sections.push(format!("{}\n", group_header(applies_to)));
        }
        sections.push(render_handler(handler.as_ref()));
    }

    sections.push(ADDING_NEW.to_string());
    sections.join("\n")
}
