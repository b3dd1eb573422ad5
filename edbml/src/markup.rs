//! Markup-mode character handling.
//!
//! | Sigil | Capture | Generated                                            |
//! |-------|---------|------------------------------------------------------|
//! | `${`  | peek    | `' + (expr) + '` spliced into the open literal       |
//! | `#{`  | poke    | hoisted `value, checked` callback + `edb.$run` ref   |
//! | `?{`  | geek    | hoisted getter + `edb.$get` ref                      |
//! | `@`   |         | attribute helper call (`$html`, `$pop`, `$all`)      |
//!
//! A capture is entered only when none is active; braces nest inside it and
//! it closes on the `}` that brings the depth back to zero.

use std::sync::LazyLock;

use log::{trace, warn};
use regex::Regex;

use crate::compiler::Names;
use crate::output::{AttCall, Binding, Outline, Output};
use crate::runner::Runner;
use crate::status::{Capture, Status};

/// Attribute name after `@`: letters, digits, `-`, `_` and `.`, not led by a
/// digit.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_.\-][A-Za-z0-9_.\-]*").expect("attribute pattern")
});

pub(crate) fn markup(
    c: char,
    runner: &Runner,
    status: &mut Status,
    output: &mut Output,
    names: &mut Names,
) {
    match c {
        '{' if status.capturing() => status.curl += 1,
        '}' if status.capturing() => {
            status.curl = status.curl.saturating_sub(1);
            if status.curl == 0 {
                close(status, output, names);
            }
        }
        '$' => open(Capture::Peek, runner, status, output),
        '#' => open(Capture::Poke, runner, status, output),
        '?' => open(Capture::Geek, runner, status, output),
        '+' if !status.capturing() => {
            if runner.first_char() {
                status.skip = usize::from(status.adds);
            } else if runner.last_char() {
                status.cont = true;
                status.skip = 1;
            }
        }
        '@' => attribute(runner, status, output),
        _ => {}
    }
}

fn open(capture: Capture, runner: &Runner, status: &mut Status, output: &mut Output) {
    if status.capturing() || !runner.ahead("{") {
        return;
    }
    status.begin(capture);
    match capture {
        Capture::Peek => output.peek_open(),
        Capture::Poke | Capture::Geek => output.temp_open(),
    }
}

fn close(status: &mut Status, output: &mut Output, names: &mut Names) {
    match status.end() {
        Some(Capture::Poke) => inject(Binding::Poke, status, output, names),
        Some(Capture::Geek) => inject(Binding::Geek, status, output, names),
        Some(Capture::Peek) | None => {}
    }
}

/// Hoist the captured text as a named helper before the current markup
/// block and reference it at the current position.
fn inject(binding: Binding, status: &Status, output: &mut Output, names: &mut Names) {
    let name = names.next_name();
    let body = output.take_temp();
    trace!("hoisting {name} ({binding:?}) at node {}", status.spot);
    output.hoist(Outline {
        anchor: status.spot,
        binding,
        name: name.clone(),
        body,
    });
    output.inline(binding, name);
}

fn attribute(runner: &Runner, status: &mut Status, output: &mut Output) {
    if runner.behind("@") {
        // The tail of `@@` is already consumed.
        if status.skip == 0 {
            warn!(
                "line {}: '@' after '@' is not supported, skipped",
                runner.line_number()
            );
        }
        return;
    }
    if runner.behind("#{") {
        warn!(
            "line {}: attribute shorthand in a '#{{' binding is not supported, skipped",
            runner.line_number()
        );
        return;
    }
    if status.capturing() {
        return;
    }
    if runner.ahead("@") {
        output.att(AttCall::All);
        status.skip = 2;
        return;
    }

    let rest = runner.line_ahead();
    let Some(found) = ATTRIBUTE.find(&rest) else {
        warn!(
            "line {}: '@' is not followed by an attribute name",
            runner.line_number()
        );
        return;
    };
    let name = found.as_str().to_owned();
    status.skip = name.chars().count() + 1;
    let call = if runner.behind("-") {
        output.trim_text_end('-');
        AttCall::Pop(name)
    } else {
        AttCall::Html(name)
    };
    output.att(call);
}
