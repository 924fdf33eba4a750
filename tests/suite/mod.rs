mod highlighting;
mod lifecycle;
mod painting;
mod scheduling;
