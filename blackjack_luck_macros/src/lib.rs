use proc_macro::TokenStream as TokenStream1;
use quote::ToTokens;
use syn::{parse_macro_input, parse_quote, Ident, ImplItemFn, LitStr};

/// This macro is added before a method of `GameSession` in the impl block.
/// Use this macro to first check if current game phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(GamblerDraws)]` will make a method first check
/// if current game phase is `GamblerDraws`. If not, the method returns
/// `BlackjackError::WrongPhase` naming the method, the expected phase and the
/// actual one. Both `GamePhase` and `BlackjackError` must be in scope where the
/// macro is used.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    let phase = parse_macro_input!(attr as Ident);
    let mut ast = parse_macro_input!(item as ImplItemFn);
    let operation = LitStr::new(&ast.sig.ident.to_string(), ast.sig.ident.span());

    let guard: syn::Stmt = parse_quote! {
        if self.current_game_phase != GamePhase::#phase {
            return Err(BlackjackError::WrongPhase {
                operation: #operation,
                expected: GamePhase::#phase,
                actual: self.current_game_phase,
            });
        }
    };
    ast.block.stmts.insert(0, guard);
    ast.into_token_stream().into()
}
