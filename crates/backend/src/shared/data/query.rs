use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::ColumnTrait;

/// Case-sensitive substring match on a text column.
///
/// `instr` instead of `LIKE` so `%` and `_` in the keyword stay literal.
pub fn contains<C: ColumnTrait>(column: C, keyword: &str) -> SimpleExpr {
    Expr::cust_with_values(
        format!("instr(\"{}\", ?) > 0", column.as_str()),
        [keyword.to_string()],
    )
}
