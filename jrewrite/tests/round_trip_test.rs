//! Untouched units must come back byte for byte.
#![allow(clippy::unwrap_used)]

use jrewrite::render::render_to_string;
use jrewrite::save::{save, SaveOutcome};
use jrewrite::tree::{Action, CompilationUnit, NodeData, NodeKind};

const SERVICE: &str = r#"/*
 * Copyright (c) Example Corp.
 */
package com.example.orders;

import java.util.*;
import java.util.function.Function;
import static java.util.Objects.requireNonNull;

/**
 * Order service.
 */
@Service
public final class OrderService<T extends Order & Comparable<T>> implements AutoCloseable {
    private static final int   LIMIT = 0x10;   // odd spacing kept
    private final Map<String, List<T>> byCustomer = new HashMap<>();

    public OrderService() {
        this(LIMIT);
    }

    OrderService(int limit) {
        super();
    }

    @Override
    public void close() throws Exception {
        byCustomer.clear();
    }

    <R> List<R> map(Function<? super T, ? extends R> fn) {
        List<R> out = new ArrayList<>();
        for (List<T> orders : byCustomer.values()) {
            for (T order : orders) out.add(fn.apply(order));
        }
        return out;
    }

    String describe(Object o) {
        return switch (o) {
            case Integer i when i > 0 -> "positive " + i;
            case String s -> """
                text block
                """;
            default -> {
                yield String.valueOf(o);
            }
        };
    }

    int legacy(int x) {
        switch (x) {
            case 1:
            case 2:
                return x << 2;
            default:
                break;
        }
        label:
        while (x-- > 0) {
            if (x % 3 == 0) continue label;
            else if (x == 7) break label;
        }
        try (var in = open(); var out = sink()) {
            in.transferTo(out);
        } catch (IOException | RuntimeException e) {
            throw new IllegalStateException(e);
        } finally {
            synchronized (this) { notifyAll(); }
        }
        int[][] grid = new int[3][];
        char c = '\n';
        long big = 1_000_000L;
        double d = .5e-3;
        Runnable r = () -> {};
        Function<String, Integer> len = String::length;
        assert x >= 0 : "negative";
        return x instanceof Integer ? (int) x : ~x;
    }
}

enum Status { NEW, PAID("paid") { @Override String label() { return "$"; } }, SHIPPED;
    Status() {}
    Status(String s) {}
    String label() { return name(); }
}

record Point(int x, int y) {
    Point {
        if (x < 0) throw new IllegalArgumentException();
    }
}

@interface Marker {
    String value() default "";
}

sealed interface Shape permits Circle {}
"#;

#[test]
fn test_untouched_unit_saves_verbatim() {
    let mut unit = CompilationUnit::parse(SERVICE).unwrap();
    let (outcome, text) = save(&mut unit);
    assert_eq!(outcome, SaveOutcome::Verbatim);
    assert_eq!(text, SERVICE);
}

#[test]
fn test_no_node_starts_dirty() {
    let unit = CompilationUnit::parse(SERVICE).unwrap();
    for id in unit.descendants(unit.root()) {
        assert_eq!(unit.action(id), Some(Action::NoChange), "{id}");
        assert!(!unit.is_dirty(id), "{id}");
    }
}

#[test]
fn test_top_level_types_render_as_original_text() {
    let unit = CompilationUnit::parse(SERVICE).unwrap();
    let Some(NodeData::CompilationUnit { types, .. }) = unit.data(unit.root()) else {
        panic!("root is not a compilation unit");
    };
    assert_eq!(types.len(), 5);
    for &ty in types {
        assert_eq!(
            Some(render_to_string(&unit, ty).as_str()),
            unit.original_text(ty)
        );
    }
}

#[test]
fn test_every_mirrored_node_has_a_parent_chain_to_the_root() {
    let unit = CompilationUnit::parse(SERVICE).unwrap();
    let root = unit.root();
    for id in unit.descendants(root) {
        if id == root {
            continue;
        }
        assert_eq!(unit.ancestors(id).last(), Some(root));
    }
    assert_eq!(unit.find_all(NodeKind::Lambda).len(), 1);
    assert_eq!(unit.find_all(NodeKind::MemberReference).len(), 1);
}

#[test]
fn test_empty_and_comment_only_files() {
    for source in ["", "// nothing here\n", "/* a */\n\n/* b */"] {
        let mut unit = CompilationUnit::parse(source).unwrap();
        assert_eq!(save(&mut unit), (SaveOutcome::Verbatim, source.to_owned()));
    }
}

#[test]
fn test_crlf_is_kept() {
    let source = "class A {\r\n    int x;\r\n}\r\n";
    let mut unit = CompilationUnit::parse(source).unwrap();
    assert_eq!(save(&mut unit).1, source);
}
