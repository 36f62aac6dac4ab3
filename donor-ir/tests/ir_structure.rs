use donor_ir::{
    FunctionBuilder, FunctionTags, IrError, Module, OpId, OpKind, TransferKind, ValueDef, span,
};

#[test]
fn builder_assigns_program_order_ids() {
    let mut b = FunctionBuilder::new("main").tags(FunctionTags::program());
    let a0 = b.arg("a0", true);
    let a1 = b.arg("a1", false);
    let (call, outs) = b.call("step", &[a0, a1], 2, &[(0, 0)]);
    let (reshard, moved) = b.transfer(TransferKind::Reshard, &[outs[1]], false);
    let ret = b.ret(&[outs[0], moved[0]]);
    let f = b.finish().expect("well-formed");

    assert_eq!((call, reshard, ret), (OpId(0), OpId(1), OpId(2)));
    assert_eq!(f.arg_position(a1), Some(1));
    assert_eq!(f.arg_position(outs[0]), None);
    assert_eq!(
        f.value_def(moved[0]),
        Some(ValueDef::OpResult { op: OpId(1), index: 0 })
    );
    assert_eq!(f.op(OpId(1)).map(|op| op.name()), Some("reshard"));
    assert!(f.is_donation_checked());
}

#[test]
fn body_without_return_is_rejected() {
    let mut b = FunctionBuilder::new("f");
    let a0 = b.arg("a0", false);
    b.other("compute", &[a0], 1);
    let err = b.finish().expect_err("missing return");
    assert!(matches!(err, IrError::MissingReturn { .. }), "{err:?}");
}

#[test]
fn empty_body_is_rejected() {
    let err = FunctionBuilder::new("f").finish().expect_err("empty body");
    assert!(matches!(err, IrError::EmptyBody { .. }), "{err:?}");
}

#[test]
fn early_return_is_rejected() {
    let mut b = FunctionBuilder::new("f");
    let a0 = b.arg("a0", false);
    b.ret(&[a0]);
    b.ret(&[a0]);
    let err = b.finish().expect_err("two returns");
    assert!(matches!(err, IrError::MisplacedReturn { .. }), "{err:?}");
}

#[test]
fn alias_past_the_inputs_is_rejected() {
    let mut b = FunctionBuilder::new("f");
    let a0 = b.arg("a0", true);
    b.at(span(10, 4));
    let (_, outs) = b.call("step", &[a0], 1, &[(3, 0)]);
    b.ret(&outs);
    match b.finish() {
        Err(IrError::AliasOutOfRange { input, inputs, span: s, .. }) => {
            assert_eq!((input, inputs), (3, 1));
            assert_eq!(s, span(10, 4));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn use_before_definition_is_rejected() {
    let text = r#"{
        "name": "m",
        "functions": [{
            "name": "f",
            "args": [],
            "ops": [
                { "id": 0, "kind": { "op": "return", "operands": [7] } }
            ]
        }]
    }"#;
    let module = Module::from_json(text).expect("json");
    let err = module.validate().expect_err("undefined %7");
    assert!(matches!(err, IrError::UndefinedValue { value: 7, .. }), "{err:?}");
}

#[test]
fn op_result_shadowing_an_argument_is_rejected() {
    let text = r#"{
        "name": "m",
        "functions": [{
            "name": "f",
            "args": [ { "name": "x", "value": 0 } ],
            "ops": [
                { "id": 0, "span": { "offset": 5, "len": 2 },
                  "kind": { "op": "other", "name": "compute", "inputs": [0], "outputs": [0] } },
                { "id": 1, "kind": { "op": "return", "operands": [0] } }
            ]
        }]
    }"#;
    let module = Module::from_json(text).expect("json");
    match module.validate() {
        Err(IrError::RedefinedValue { value, span: s, .. }) => {
            assert_eq!(value, 0);
            assert_eq!(s, span(5, 2));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn op_ids_out_of_program_order_are_rejected() {
    let text = r#"{
        "name": "m",
        "functions": [{
            "name": "f",
            "args": [ { "name": "x", "value": 0 } ],
            "ops": [
                { "id": 1, "kind": { "op": "other", "name": "compute", "inputs": [0], "outputs": [1] } },
                { "id": 0, "kind": { "op": "return", "operands": [1] } }
            ]
        }]
    }"#;
    let module = Module::from_json(text).expect("json");
    let err = module.validate().expect_err("swapped ids");
    assert!(
        matches!(err, IrError::OpIdMismatch { position: 0, id: 1, .. }),
        "{err:?}"
    );
}

#[test]
fn module_json_defaults_tags_flags_and_spans() {
    let text = r#"{
        "name": "m",
        "functions": [{
            "name": "main",
            "tags": { "program": true },
            "args": [ { "name": "x", "value": 0, "donated": true } ],
            "ops": [
                { "id": 0, "span": { "offset": 3, "len": 5 },
                  "kind": { "op": "call_like", "kind": "call_loaded_executable",
                            "callee": "exe", "inputs": [0], "outputs": [1],
                            "io_aliases": [ { "input": 0, "output": 0 } ] } },
                { "id": 1, "kind": { "op": "transfer_like", "kind": "copy_arrays",
                                     "inputs": [1], "outputs": [2] } },
                { "id": 2, "kind": { "op": "return", "operands": [2] } }
            ]
        }]
    }"#;
    let module = Module::from_json(text).expect("json");
    module.validate().expect("valid");

    let f = &module.functions[0];
    assert_eq!(f.name, "main");
    assert!(f.tags.program && !f.tags.reshard);
    assert_eq!(f.ops[0].span, span(3, 5));
    match &f.ops[1].kind {
        OpKind::TransferLike(t) => assert!(!t.donated),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(f.ops[0].name(), "call_loaded_executable");

    let again = Module::from_json(&module.to_json_pretty().expect("serialize")).expect("reparse");
    assert_eq!(again, module);
}

#[test]
fn malformed_json_is_an_ir_error() {
    let err = Module::from_json("{ \"name\": 3 }").expect_err("bad json");
    assert!(matches!(err, IrError::Json { .. }), "{err:?}");
}

#[test]
fn printer_shows_donation_annotations() {
    let mut b = FunctionBuilder::new("main").tags(FunctionTags::program());
    let a0 = b.arg("a0", true);
    let a1 = b.arg("a1", false);
    let (_, outs) = b.call("step", &[a0, a1], 1, &[(0, 0)]);
    let (_, copied) = b.transfer(TransferKind::CopyArrays, &[outs[0]], true);
    b.ret(&copied);
    let f = b.finish().expect("well-formed");

    let text = f.to_string();
    assert_eq!(
        text,
        "func @main(%arg0 {donated}, %arg1) attributes {program} {\n  \
         %2 = call @step(%arg0, %arg1) io_aliases [0 -> 0]\n  \
         %3 = copy_arrays(%2) {donated}\n  \
         return %3\n}"
    );
}
