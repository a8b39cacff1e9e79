#[derive(Default, PartialEq, Eq, Debug, Clone, Copy)]
pub enum Status {
    #[default]
    NotSolved,
    BadInput,
    Infeasible,
    NotOptimal,
    Optimal,
}
