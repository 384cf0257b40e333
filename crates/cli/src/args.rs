use clap::ValueEnum;

/// Args decouple of CLI arg handling requirements from the internal data structures

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOrClearOperationArg {
    Set,
    Clear,
}

impl From<SetOrClearOperationArg> for bool {
    fn from(value: SetOrClearOperationArg) -> Self {
        match value {
            SetOrClearOperationArg::Set => true,
            SetOrClearOperationArg::Clear => false,
        }
    }
}
