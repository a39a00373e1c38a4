use crate::js::syntax::builder::JsBuilder;

/// Two small class hierarchies, `Foo extends FooBase` and
/// `ns.Foo extends ns.FooBase`, shared by the pass tests.
pub fn boilerplate(t: &mut JsBuilder) {
    t.doc("@constructor");
    t.var("FooBase", t.function(&[], |_| {}));
    t.assign_stmt(t.path("FooBase.prototype.bar"), t.function(&[], |_| {}));
    t.doc("@param {number} time @param {number} loc @return {number}");
    t.assign_stmt(
        t.path("FooBase.prototype.baz"),
        t.function(&["time", "loc"], |t| {
            t.ret(t.num(2.0));
        }),
    );
    t.doc("@param {number} time @param {number=} opt_loc");
    t.assign_stmt(
        t.path("FooBase.prototype.buzz"),
        t.function(&["time", "opt_loc"], |_| {}),
    );
    t.doc("@param {...number} var_args");
    t.assign_stmt(
        t.path("FooBase.prototype.var"),
        t.function(&["var_args"], |_| {}),
    );
    t.doc("@constructor @extends {FooBase}");
    t.var("Foo", t.function(&[], |_| {}));
    t.assign_stmt(t.path("Foo.superClass_"), t.path("FooBase.prototype"));

    t.var("ns", t.object(vec![]));
    t.doc("@constructor");
    t.assign_stmt(t.path("ns.FooBase"), t.function(&[], |_| {}));
    t.assign_stmt(t.path("ns.FooBase.prototype.bar"), t.function(&[], |_| {}));
    t.doc("@constructor @extends {ns.FooBase}");
    t.assign_stmt(t.path("ns.Foo"), t.function(&[], |_| {}));
    t.assign_stmt(t.path("ns.Foo.superClass_"), t.path("ns.FooBase.prototype"));
}
