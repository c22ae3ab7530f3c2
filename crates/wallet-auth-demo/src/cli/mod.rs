/*
[INPUT]:  Terminal user input
[OUTPUT]: Interactive session menu
[POS]:    CLI module root
[UPDATE]: When adding CLI flows
*/

pub mod interactive;
