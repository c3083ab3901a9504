//! Dialect feature flags.
//!
//! A `Dialect` is an immutable set of booleans gating grammar productions
//! and error messages. The parser consumes dialects; it never computes
//! them. Presets cover the shipped language editions; `unquoting()`
//! derives the quasiquote variant of any dialect.

/// Feature flags for one language edition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialect {
    /// Human-readable name used in "dialect does not support" errors.
    pub name: &'static str,

    pub allow_significant_indentation: bool,
    pub allow_unquotes: bool,
    pub allow_type_lambdas: bool,
    pub allow_given_using: bool,
    pub allow_postfix_star_vararg_splices: bool,
    pub allow_match_as_operator: bool,
    pub allow_upper_case_pattern_var_binding: bool,
    pub allow_xml_literals: bool,
    pub allow_trailing_commas: bool,
    pub allow_existential_types: bool,
    pub allow_view_bounds: bool,
    pub allow_procedure_syntax: bool,
    pub allow_extension_methods: bool,
    pub allow_enums: bool,
    pub allow_export_clauses: bool,
    pub allow_open_modifier: bool,
    pub allow_opaque_types: bool,
    pub allow_context_function_types: bool,
    pub allow_dependent_function_types: bool,
    pub allow_polymorphic_function_types: bool,
    pub allow_end_markers: bool,
    pub allow_derives_clauses: bool,
    pub allow_symbol_literals: bool,
    pub allow_do_while: bool,
    pub allow_literal_types: bool,
    pub allow_inline_modifier: bool,
    pub allow_infix_modifier: bool,
    pub allow_transparent_modifier: bool,
    pub allow_macro_quotes: bool,
    pub allow_try_with_any_expr: bool,
    pub allow_question_mark_type_wildcard: bool,
    pub allow_trait_parameters: bool,
}

impl Dialect {
    /// The original brace-only edition.
    pub fn classic() -> Self {
        Dialect {
            name: "Vela Classic",
            allow_significant_indentation: false,
            allow_unquotes: false,
            allow_type_lambdas: false,
            allow_given_using: false,
            allow_postfix_star_vararg_splices: false,
            allow_match_as_operator: false,
            allow_upper_case_pattern_var_binding: false,
            allow_xml_literals: true,
            allow_trailing_commas: false,
            allow_existential_types: true,
            allow_view_bounds: true,
            allow_procedure_syntax: true,
            allow_extension_methods: false,
            allow_enums: false,
            allow_export_clauses: false,
            allow_open_modifier: false,
            allow_opaque_types: false,
            allow_context_function_types: false,
            allow_dependent_function_types: false,
            allow_polymorphic_function_types: false,
            allow_end_markers: false,
            allow_derives_clauses: false,
            allow_symbol_literals: true,
            allow_do_while: true,
            allow_literal_types: false,
            allow_inline_modifier: false,
            allow_infix_modifier: false,
            allow_transparent_modifier: false,
            allow_macro_quotes: false,
            allow_try_with_any_expr: true,
            allow_question_mark_type_wildcard: false,
            allow_trait_parameters: false,
        }
    }

    /// The transitional edition: new declaration forms, braces required.
    pub fn standard() -> Self {
        Dialect {
            name: "Vela Standard",
            allow_trailing_commas: true,
            allow_literal_types: true,
            ..Self::classic()
        }
    }

    /// The current edition: everything, including significant indentation.
    pub fn modern() -> Self {
        Dialect {
            name: "Vela Modern",
            allow_significant_indentation: true,
            allow_type_lambdas: true,
            allow_given_using: true,
            allow_postfix_star_vararg_splices: true,
            allow_match_as_operator: true,
            allow_upper_case_pattern_var_binding: true,
            allow_xml_literals: false,
            allow_trailing_commas: true,
            allow_existential_types: false,
            allow_view_bounds: false,
            allow_procedure_syntax: false,
            allow_extension_methods: true,
            allow_enums: true,
            allow_export_clauses: true,
            allow_open_modifier: true,
            allow_opaque_types: true,
            allow_context_function_types: true,
            allow_dependent_function_types: true,
            allow_polymorphic_function_types: true,
            allow_end_markers: true,
            allow_derives_clauses: true,
            allow_symbol_literals: false,
            allow_do_while: false,
            allow_literal_types: true,
            allow_inline_modifier: true,
            allow_infix_modifier: true,
            allow_transparent_modifier: true,
            allow_macro_quotes: true,
            allow_try_with_any_expr: true,
            allow_question_mark_type_wildcard: true,
            allow_trait_parameters: true,
            allow_unquotes: false,
        }
    }

    /// Derive the quasiquote variant: same grammar plus `$` unquoting,
    /// admitting a `Quasi` node in every tree family.
    #[must_use]
    pub fn unquoting(mut self) -> Self {
        self.allow_unquotes = true;
        self
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::modern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_where_expected() {
        let classic = Dialect::classic();
        let modern = Dialect::modern();
        assert!(!classic.allow_significant_indentation);
        assert!(modern.allow_significant_indentation);
        assert!(classic.allow_procedure_syntax);
        assert!(!modern.allow_procedure_syntax);
        assert!(classic.allow_xml_literals);
    }

    #[test]
    fn unquoting_preserves_base_flags() {
        let q = Dialect::modern().unquoting();
        assert!(q.allow_unquotes);
        assert!(q.allow_significant_indentation);
    }
}
