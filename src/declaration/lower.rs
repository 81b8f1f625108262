use crate::declaration::{Annotation, ClassDecl, DocComment, MethodDecl, ParamDecl, SourceUnit};
use crate::parser::ParsedFile;
use crate::type_resolver::TypeRef;
use log::debug;
use syn::visit::Visit;
use syn::{Attribute, FnArg, Pat, ReturnType, Signature};

/// Lower a parsed file into its declaration tree.
///
/// Every `impl` and `trait` block becomes a [`ClassDecl`], including blocks
/// nested in inline modules. Order follows the source.
pub fn lower_file(parsed: &ParsedFile) -> SourceUnit {
    let mut visitor = DeclVisitor { classes: Vec::new() };
    visitor.visit_file(&parsed.syntax_tree);
    debug!(
        "Lowered {} declaration units from {}",
        visitor.classes.len(),
        parsed.path.display()
    );
    SourceUnit {
        path: parsed.path.clone(),
        classes: visitor.classes,
    }
}

struct DeclVisitor {
    classes: Vec<ClassDecl>,
}

impl<'ast> Visit<'ast> for DeclVisitor {
    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let name = TypeRef::from_syn(&node.self_ty).name;
        let methods = node
            .items
            .iter()
            .filter_map(|item| match item {
                syn::ImplItem::Fn(f) => Some(lower_method(&f.attrs, &f.sig)),
                _ => None,
            })
            .collect();

        self.classes.push(ClassDecl {
            name,
            annotations: lower_annotations(&node.attrs),
            doc: DocComment::from_attrs(&node.attrs),
            methods,
        });
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        let methods = node
            .items
            .iter()
            .filter_map(|item| match item {
                syn::TraitItem::Fn(f) => Some(lower_method(&f.attrs, &f.sig)),
                _ => None,
            })
            .collect();

        self.classes.push(ClassDecl {
            name: node.ident.to_string(),
            annotations: lower_annotations(&node.attrs),
            doc: DocComment::from_attrs(&node.attrs),
            methods,
        });
    }
}

pub(crate) fn lower_annotations(attrs: &[Attribute]) -> Vec<Annotation> {
    attrs.iter().filter_map(Annotation::from_attribute).collect()
}

fn lower_method(attrs: &[Attribute], sig: &Signature) -> MethodDecl {
    let params = sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(ParamDecl {
                name: pattern_name(&pat_type.pat),
                type_ref: TypeRef::from_syn(&pat_type.ty),
                annotations: lower_annotations(&pat_type.attrs),
            }),
            FnArg::Receiver(_) => None,
        })
        .collect();

    let return_type = match &sig.output {
        ReturnType::Default => None,
        ReturnType::Type(_, ty) => Some(TypeRef::from_syn(ty)).filter(|t| !t.is_unit()),
    };

    MethodDecl {
        name: sig.ident.to_string(),
        annotations: lower_annotations(attrs),
        doc: DocComment::from_attrs(attrs),
        params,
        return_type,
    }
}

/// Name bound by a parameter pattern: `id`, `mut id`, or the inner binding of
/// a single-field tuple struct pattern such as `Path(id)`.
fn pattern_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.ident.to_string()),
        Pat::TupleStruct(tuple) if tuple.elems.len() == 1 => pattern_name(&tuple.elems[0]),
        Pat::Reference(reference) => pattern_name(&reference.pat),
        Pat::Type(typed) => pattern_name(&typed.pat),
        _ => None,
    }
}
