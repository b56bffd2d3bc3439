pub mod roadsim_interface;
