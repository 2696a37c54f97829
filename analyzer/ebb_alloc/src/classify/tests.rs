use pretty_assertions::assert_eq;

use ebb_sym::{FnDecl, OwnershipAttr, OwnershipKind, StringInterner};

use super::{classify, CallAction};
use crate::checker::AllocChecker;

struct Setup {
    interner: StringInterner,
    checker: AllocChecker,
}

fn setup() -> Setup {
    let interner = StringInterner::new();
    let checker = AllocChecker::new(&interner);
    Setup { interner, checker }
}

#[test]
fn reserved_names_classify_directly() {
    let s = setup();
    let cases = [
        ("malloc", CallAction::Malloc),
        ("free", CallAction::Free),
        ("realloc", CallAction::Realloc),
        ("calloc", CallAction::Calloc),
    ];
    for (name, expected) in cases {
        let decl = FnDecl::new(s.interner.intern(name));
        let actions = classify(&decl, &s.checker.names);
        assert_eq!(actions.as_slice(), &[expected]);
    }
}

#[test]
fn unknown_names_without_attributes_classify_as_nothing() {
    let s = setup();
    let decl = FnDecl::new(s.interner.intern("strdup"));
    assert!(classify(&decl, &s.checker.names).is_empty());
}

#[test]
fn returns_attribute_allocates_with_optional_size_index() {
    let s = setup();
    let module = s.interner.intern("malloc");

    let sized = FnDecl::new(s.interner.intern("my_alloc"))
        .with_attr(OwnershipAttr::new(OwnershipKind::Returns, module, [1]));
    assert_eq!(
        classify(&sized, &s.checker.names).as_slice(),
        &[CallAction::AttrAlloc { size_arg: Some(1) }]
    );

    let unsized_ = FnDecl::new(s.interner.intern("my_alloc2"))
        .with_attr(OwnershipAttr::new(OwnershipKind::Returns, module, []));
    assert_eq!(
        classify(&unsized_, &s.checker.names).as_slice(),
        &[CallAction::AttrAlloc { size_arg: None }]
    );
}

#[test]
fn takes_and_holds_release_each_listed_argument() {
    let s = setup();
    let module = s.interner.intern("malloc");

    let decl = FnDecl::new(s.interner.intern("my_free"))
        .with_attr(OwnershipAttr::new(OwnershipKind::Takes, module, [0, 2]));
    assert_eq!(
        classify(&decl, &s.checker.names).as_slice(),
        &[
            CallAction::AttrFree { arg: 0, hold: false },
            CallAction::AttrFree { arg: 2, hold: false },
        ]
    );

    let holder = FnDecl::new(s.interner.intern("my_hold"))
        .with_attr(OwnershipAttr::new(OwnershipKind::Holds, module, [1]));
    assert_eq!(
        classify(&holder, &s.checker.names).as_slice(),
        &[CallAction::AttrFree { arg: 1, hold: true }]
    );
}

#[test]
fn attributes_of_other_modules_are_ignored() {
    let s = setup();
    let other = s.interner.intern("pool");
    let decl = FnDecl::new(s.interner.intern("pool_get"))
        .with_attr(OwnershipAttr::new(OwnershipKind::Returns, other, []));
    assert!(classify(&decl, &s.checker.names).is_empty());
}

#[test]
fn multiple_attributes_each_contribute() {
    let s = setup();
    let module = s.interner.intern("malloc");
    // A reallocator shape: takes the old block, returns a new one.
    let decl = FnDecl::new(s.interner.intern("my_realloc"))
        .with_attr(OwnershipAttr::new(OwnershipKind::Takes, module, [0]))
        .with_attr(OwnershipAttr::new(OwnershipKind::Returns, module, [1]));
    assert_eq!(
        classify(&decl, &s.checker.names).as_slice(),
        &[
            CallAction::AttrFree { arg: 0, hold: false },
            CallAction::AttrAlloc { size_arg: Some(1) },
        ]
    );
}

#[test]
fn reserved_names_win_over_attributes() {
    let s = setup();
    let module = s.interner.intern("malloc");
    let decl = FnDecl::new(s.interner.intern("free"))
        .with_attr(OwnershipAttr::new(OwnershipKind::Returns, module, []));
    assert_eq!(classify(&decl, &s.checker.names).as_slice(), &[CallAction::Free]);
}
