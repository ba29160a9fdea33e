use cmdscript::lexer::{self, TAB_WIDTH};
use cmdscript::notify::Unavailable;
use cmdscript::parser::{classify, parse};
use cmdscript::{load, Buffer, Error, Evaluator, Value};
use proptest::prelude::*;

fn assign_int(literal: &str) -> Result<Value, Error> {
    let src = format!("n%alias = g\nn%type = int\nn%value = {literal}");
    let mut eval = Evaluator::new(load(&src).map_err(|e| e.error)?, Buffer::new(), Unavailable);
    eval.run().map_err(|e| e.error)?;
    Ok(eval.variables().read("n")?.clone())
}

proptest! {
    /// Well-formed integer literals are stored and read back unchanged.
    #[test]
    fn integer_literals_round_trip(n in any::<i64>()) {
        prop_assert_eq!(assign_int(&n.to_string()).unwrap(), Value::Integer(n));
    }

    /// Any literal with a decimal point is rejected by an int variable.
    #[test]
    fn decimal_literals_never_fit_an_int(whole in -100_000i64..100_000, frac in 0u32..1000) {
        let err = assign_int(&format!("{whole}.{frac}")).unwrap_err();
        prop_assert!(matches!(err, Error::TypeMismatch(_)), "{:?}", err);
    }

    /// The classifier returns Ok or Err but never panics.
    #[test]
    fn classifier_does_not_panic(s in "\\PC*") {
        let _ = parse(&s);
    }

    /// Extra spaces between tokens change neither tokens nor depth, and the
    /// rendered statement classifies back to the same thing.
    #[test]
    fn whitespace_reformatting_is_lossless(
        indent in 0usize..12,
        tabs in 0usize..3,
        gaps in proptest::collection::vec(1usize..5, 4),
    ) {
        let lead = format!("{}{}", "\t".repeat(tabs), " ".repeat(indent));
        let words = ["write", "\"a  b\"", "%var", "name"];
        let mut line = lead.clone();
        for (word, gap) in words.iter().zip(&gaps) {
            line.push_str(word);
            line.push_str(&" ".repeat(*gap));
        }

        let stmt = classify(lexer::tokenize_line(1, &line).unwrap().unwrap()).unwrap();
        prop_assert_eq!(stmt.depth, tabs * TAB_WIDTH + indent);

        let rendered = stmt.to_string();
        let again = classify(lexer::tokenize_line(1, &rendered).unwrap().unwrap()).unwrap();
        prop_assert_eq!(&again.tokens, &stmt.tokens);
        prop_assert_eq!(again.depth, stmt.depth);
        prop_assert_eq!(&again.kind, &stmt.kind);
    }

    /// Re-indenting a body line to the header's depth removes it from the
    /// block; any deeper indentation keeps it inside.
    #[test]
    fn indentation_decides_block_membership(header in 0usize..8, extra in 1usize..8) {
        let pad = |n: usize| " ".repeat(n);
        let inside = format!(
            "{h}%if 1 = 2\n{b}write \"a\"\n{b}write \"b\"",
            h = pad(header),
            b = pad(header + extra)
        );
        let outside = format!(
            "{h}%if 1 = 2\n{b}write \"a\"\n{h}write \"b\"",
            h = pad(header),
            b = pad(header + extra)
        );

        let mut eval = Evaluator::new(load(&inside).unwrap(), Buffer::new(), Unavailable);
        eval.run().unwrap();
        prop_assert_eq!(eval.host().output.as_str(), "");

        let mut eval = Evaluator::new(load(&outside).unwrap(), Buffer::new(), Unavailable);
        eval.run().unwrap();
        prop_assert_eq!(eval.host().output.as_str(), "b");
    }
}
