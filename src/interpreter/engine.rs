// Execution engine for the preprocessor

use crate::definitions::Definitions;
use crate::output::Output;
use crate::parser::ast::*;
use tracing::debug;

/// Walks a parsed file, emitting text and mutating the definition set
///
/// The definitions are borrowed for the lifetime of the interpreter, so the
/// caller sees every `@define`/`@undef` that was actually executed once the
/// run is over.
pub struct Interpreter<'a> {
    /// Definition context, mutated in place
    defs: &'a mut Definitions,

    /// Lines emitted so far
    output: Output,
}

impl<'a> Interpreter<'a> {
    pub fn new(defs: &'a mut Definitions) -> Self {
        Interpreter {
            defs,
            output: Output::new(),
        }
    }

    /// Run a whole file and hand back what it emitted
    pub fn run(&mut self, root: &Block) -> Output {
        self.execute_block(root);
        std::mem::take(&mut self.output)
    }

    pub fn definitions(&self) -> &Definitions {
        &*self.defs
    }

    fn execute_block(&mut self, block: &Block) {
        for node in &block.nodes {
            self.execute_node(node);
        }
    }

    fn execute_node(&mut self, node: &Node) {
        match node {
            Node::Text(line) => self.output.emit(line.clone()),
            Node::Define { name, location } => {
                debug!(line = location.line, "@Define({})", name);
                self.defs.define(name.as_str());
            }
            Node::Undef { name, location } => {
                debug!(line = location.line, "@Undef({})", name);
                self.defs.undef(name);
            }
            Node::Condition(cond) => self.execute_condition(cond),
        }
    }

    /// Exactly one of body / else chain runs; the rest of the chain is not
    /// even looked at once a branch is taken.
    fn execute_condition(&mut self, cond: &Condition) {
        let mut current = cond;
        let mut is_elif = false;

        loop {
            let truth = self.defs.contains(&current.key) != current.negated;

            debug!(
                line = current.location.line,
                "@{}({}): {}",
                directive_label(current.negated, is_elif),
                current.key,
                truth
            );

            if truth {
                self.execute_block(&current.body);
                return;
            }

            match &current.else_branch {
                Some(ElseBranch::Elif(next)) => {
                    current = next.as_ref();
                    is_elif = true;
                }
                Some(ElseBranch::Else(block)) => {
                    debug!("@Else");
                    self.execute_block(block);
                    return;
                }
                None => return,
            }
        }
    }
}

/// Trace label for a link in a condition chain
fn directive_label(negated: bool, is_elif: bool) -> &'static str {
    match (is_elif, negated) {
        (false, false) => "If",
        (false, true) => "Ifnot",
        (true, false) => "Elif",
        (true, true) => "Elifnot",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn run(source: &str, defs: &mut Definitions) -> Vec<String> {
        let root = Parser::new(source).parse_file().expect("parse failed");
        Interpreter::new(defs)
            .run(&root)
            .texts()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn text_is_emitted_in_order() {
        let mut defs = Definitions::new();
        assert_eq!(run("a\nb\nc\n", &mut defs), vec!["a", "b", "c"]);
    }

    #[test]
    fn ifnot_inverts_the_test() {
        let source = "@ifnot A\nwithout\n@else\nwith\n@end\n";

        let mut defs = Definitions::new();
        assert_eq!(run(source, &mut defs), vec!["without"]);

        let mut defs: Definitions = ["A"].into_iter().collect();
        assert_eq!(run(source, &mut defs), vec!["with"]);
    }

    #[test]
    fn elifnot_inverts_the_test() {
        let source = "@if A\na\n@elifnot B\nnot b\n@end\n";

        let mut defs = Definitions::new();
        assert_eq!(run(source, &mut defs), vec!["not b"]);

        let mut defs: Definitions = ["B"].into_iter().collect();
        assert!(run(source, &mut defs).is_empty());
    }

    #[test]
    fn define_in_taken_branch_persists() {
        let mut defs: Definitions = ["A"].into_iter().collect();
        run("@if A\n@define B\n@undef A\n@end\n", &mut defs);

        assert!(defs.contains("B"));
        assert!(!defs.contains("A"));
    }

    #[test]
    fn define_in_untaken_branch_has_no_effect() {
        let mut defs = Definitions::new();
        run("@if A\n@define B\n@else\n@undef C\n@end\n", &mut defs);
        assert!(!defs.contains("B"));

        let mut defs: Definitions = ["A", "C"].into_iter().collect();
        run("@if A\nx\n@else\n@undef C\n@end\n", &mut defs);
        assert!(defs.contains("C"));
    }

    #[test]
    fn elif_is_not_evaluated_after_a_taken_branch() {
        // The body defines B; the following @elif B must still be skipped.
        let source = "@if A\n@define B\nfirst\n@elif B\nsecond\n@end\n";
        let mut defs: Definitions = ["A"].into_iter().collect();

        assert_eq!(run(source, &mut defs), vec!["first"]);
        assert!(defs.contains("B"));
    }

    #[test]
    fn define_is_not_visible_to_earlier_lines() {
        let source = "@if X\nbefore\n@end\n@define X\n@if X\nafter\n@end\n";
        let mut defs = Definitions::new();
        assert_eq!(run(source, &mut defs), vec!["after"]);
    }

    #[test]
    fn nested_conditions_require_every_enclosing_branch() {
        let source = "@if A\n@if B\nboth\n@end\nonly a\n@end\n";

        let mut defs: Definitions = ["B"].into_iter().collect();
        assert!(run(source, &mut defs).is_empty());

        let mut defs: Definitions = ["A", "B"].into_iter().collect();
        assert_eq!(run(source, &mut defs), vec!["both", "only a"]);
    }

    #[test]
    fn run_can_be_repeated_with_a_reseeded_context() {
        let root = Parser::new("@if A\n@undef A\none\n@else\n@define A\ntwo\n@end\n")
            .parse_file()
            .unwrap();
        let seed: Definitions = ["A"].into_iter().collect();

        let mut first_defs = seed.clone();
        let first = Interpreter::new(&mut first_defs).run(&root);
        let mut second_defs = seed.clone();
        let second = Interpreter::new(&mut second_defs).run(&root);

        assert_eq!(first, second);
        assert_eq!(first.texts(), vec!["one"]);
        assert_eq!(first_defs, second_defs);
    }

    #[test]
    fn long_elif_chain_runs_iteratively() {
        let mut source = String::from("@if K0\nfirst\n");
        for i in 1..10_000 {
            source.push_str(&format!("@elif K{}\nline {}\n", i, i));
        }
        source.push_str("@end\n");

        let mut defs: Definitions = ["K9999"].into_iter().collect();
        assert_eq!(run(&source, &mut defs), vec!["line 9999"]);

        let mut defs = Definitions::new();
        assert!(run(&source, &mut defs).is_empty());
    }

    #[test]
    fn chain_links_are_labelled_by_position() {
        assert_eq!(directive_label(false, false), "If");
        assert_eq!(directive_label(true, false), "Ifnot");
        assert_eq!(directive_label(false, true), "Elif");
        assert_eq!(directive_label(true, true), "Elifnot");
    }

    #[test]
    fn definitions_are_visible_through_the_interpreter() {
        let mut defs = Definitions::new();
        let root = Parser::new("@define Z\n").parse_file().unwrap();
        let mut interpreter = Interpreter::new(&mut defs);
        interpreter.run(&root);
        assert!(interpreter.definitions().contains("Z"));
    }
}
